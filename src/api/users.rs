use crate::http::{ApiClient, ApiError};
use crate::models::{Privilege, User};
use crate::validation::{PrivilegeGrant, UserDraft};

use super::Resource;

pub type UsersApi = Resource<User, UserDraft>;

pub(crate) fn users(client: &ApiClient) -> UsersApi {
    Resource::new(client, "/users", "users", "user").patching()
}

impl Resource<User, UserDraft> {
    /// `POST /users/:id/privileges`.
    pub async fn grant_privileges(&self, user_id: &str, privileges: &[Privilege]) -> Result<(), ApiError> {
        let body = PrivilegeGrant {
            privileges: privileges.to_vec(),
        };
        self.client()
            .post(&self.member(&format!("{user_id}/privileges")), &body)
            .await?;
        Ok(())
    }

    /// `DELETE /users/:id/privileges` with the privileges in the body.
    pub async fn revoke_privileges(&self, user_id: &str, privileges: &[Privilege]) -> Result<(), ApiError> {
        let body = PrivilegeGrant {
            privileges: privileges.to_vec(),
        };
        self.client()
            .delete_with_body(&self.member(&format!("{user_id}/privileges")), &body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn users_update_with_patch() {
        let env = TestEnv::signed_in().await;
        env.backend.on("PATCH", "/users/u1", 200, json!({"user": {"_id": "u1", "username": "mona"}}));
        let api = users(&env.client);

        let user = api
            .update(
                "u1",
                &UserDraft {
                    username: "mona".into(),
                    ..UserDraft::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(user.username, "mona");
        assert!(env.backend.last("PATCH", "/users/u1").json().get("password").is_none());
    }

    #[tokio::test]
    async fn grant_and_revoke_hit_privilege_endpoint() {
        let env = TestEnv::signed_in().await;
        env.backend.on("POST", "/users/u1/privileges", 200, json!({}));
        env.backend.on("DELETE", "/users/u1/privileges", 200, json!({}));
        let api = users(&env.client);

        api.grant_privileges("u1", &[Privilege::huge_sale()]).await.unwrap();
        api.revoke_privileges("u1", &[Privilege::new("stock", "delete")]).await.unwrap();

        let granted = env.backend.last("POST", "/users/u1/privileges").json();
        assert_eq!(granted["privileges"][0]["operation"], "makeHugeSale");
        let revoked = env.backend.last("DELETE", "/users/u1/privileges").json();
        assert_eq!(revoked["privileges"][0]["module"], "stock");
    }
}
