use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate a wire enum with `as_str`, `ALL`, `Display` and
/// `std::str::FromStr`; serde uses the same strings.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Receptionist => "receptionist",
    Doctor => "doctor",
    Radiologist => "radiologist",
    SuperAdmin => "superAdmin",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(Priority {
    Routine => "routine",
    Urgent => "urgent",
    Emergency => "emergency",
});

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    InProgress => "in-progress",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no-show",
    Pending => "pending",
});

str_enum!(AuditAction {
    Create => "CREATE",
    Update => "UPDATE",
    Delete => "DELETE",
    StatusChange => "STATUS_CHANGE",
});

str_enum!(SortOrder {
    Asc => "asc",
    Desc => "desc",
});

str_enum!(StatsPeriod {
    Day => "day",
    Week => "week",
    Month => "month",
    Year => "year",
});

impl Default for Role {
    fn default() -> Self {
        Role::Receptionist
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Routine
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

impl Default for StatsPeriod {
    fn default() -> Self {
        StatsPeriod::Week
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_uses_kebab_strings() {
        assert_eq!(AppointmentStatus::InProgress.as_str(), "in-progress");
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::NoShow).unwrap(),
            "\"no-show\""
        );
        assert_eq!(
            AppointmentStatus::from_str("cancelled").unwrap(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn role_super_admin_is_camel_case() {
        let role: Role = serde_json::from_str("\"superAdmin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }

    #[test]
    fn audit_action_is_upper_case() {
        assert_eq!(
            serde_json::to_string(&AuditAction::StatusChange).unwrap(),
            "\"STATUS_CHANGE\""
        );
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = Priority::from_str("whenever").unwrap_err();
        assert!(err.to_string().contains("Priority"));
        assert!(serde_json::from_str::<Gender>("\"unknown\"").is_err());
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(AppointmentStatus::ALL.len(), 7);
        assert_eq!(Priority::ALL, &[Priority::Routine, Priority::Urgent, Priority::Emergency]);
    }
}
