//! 认证用户与激活令牌存储操作

use super::{SeaOrmStorage, db_error, new_id};
use crate::entity::account_activations::{
    ActiveModel as ActivationActiveModel, Column as ActivationColumn,
    Entity as AccountActivations,
};
use crate::entity::auth_users::{ActiveModel, Column, Entity as AuthUsers};
use crate::entity::user_metadata::{
    ActiveModel as MetadataActiveModel, Column as MetadataColumn, Entity as UserMetadatas,
};
use crate::errors::Result;
use crate::models::auth::entities::{ActivationDetails, NewUser, User, UserRole, UserUpdate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户，新用户默认未激活
    pub async fn create_user_impl(&self, user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(new_id()),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            enabled: Set(false),
            account_non_expired: Set(false),
            account_non_locked: Set(false),
            credentials_non_expired: Set(false),
            role_type: Set(UserRole::User.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建用户失败"))?;
        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: &str) -> Result<Option<User>> {
        let result = AuthUsers::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = AuthUsers::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户资料
    pub async fn update_user_impl(&self, id: &str, update: UserUpdate) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }

        let updated = model.update(&self.db).await.map_err(db_error("更新用户失败"))?;
        Ok(Some(updated.into_user()))
    }

    /// 删除用户（激活令牌与元数据级联删除）
    pub async fn delete_user_impl(&self, id: &str) -> Result<bool> {
        let result = AuthUsers::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_error("删除用户失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 修改用户角色
    pub async fn set_user_role_impl(&self, id: &str, role: UserRole) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id.to_string()),
            role_type: Set(role.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新用户角色失败"))?;
        Ok(Some(updated.into_user()))
    }

    /// 记录最近登录时间
    pub async fn record_user_login_impl(&self, user_id: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let existing = UserMetadatas::find()
            .filter(MetadataColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询用户元数据失败"))?;

        match existing {
            Some(metadata) => {
                let mut model: MetadataActiveModel = metadata.into();
                model.last_login_at = Set(now);
                model
                    .update(&self.db)
                    .await
                    .map_err(db_error("更新用户元数据失败"))?;
            }
            None => {
                MetadataActiveModel {
                    id: Set(new_id()),
                    user_id: Set(user_id.to_string()),
                    last_login_at: Set(now),
                }
                .insert(&self.db)
                .await
                .map_err(db_error("创建用户元数据失败"))?;
            }
        }

        Ok(())
    }

    /// 为用户创建或替换激活令牌
    pub async fn replace_activation_impl(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<ActivationDetails> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        AccountActivations::delete_many()
            .filter(ActivationColumn::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_error("删除旧激活令牌失败"))?;

        let created = ActivationActiveModel {
            id: Set(new_id()),
            token: Set(token.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
        }
        .insert(&txn)
        .await
        .map_err(db_error("创建激活令牌失败"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(created.into_activation())
    }

    /// 通过令牌获取激活信息
    pub async fn get_activation_by_token_impl(
        &self,
        token: &str,
    ) -> Result<Option<ActivationDetails>> {
        let result = AccountActivations::find()
            .filter(ActivationColumn::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(db_error("查询激活令牌失败"))?;

        Ok(result.map(|m| m.into_activation()))
    }

    /// 通过用户 ID 获取激活信息
    pub async fn get_activation_by_user_impl(
        &self,
        user_id: &str,
    ) -> Result<Option<ActivationDetails>> {
        let result = AccountActivations::find()
            .filter(ActivationColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询激活令牌失败"))?;

        Ok(result.map(|m| m.into_activation()))
    }

    /// 启用账户并删除激活令牌
    pub async fn activate_user_impl(&self, activation: &ActivationDetails) -> Result<()> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        ActiveModel {
            id: Set(activation.user_id.clone()),
            enabled: Set(true),
            account_non_expired: Set(true),
            account_non_locked: Set(true),
            credentials_non_expired: Set(true),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(db_error("激活用户失败"))?;

        AccountActivations::delete_by_id(activation.id.clone())
            .exec(&txn)
            .await
            .map_err(db_error("删除激活令牌失败"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{name}@lbu.ac.uk"),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_defaults_to_disabled() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let user = storage.create_user_impl(new_user("ada")).await.expect("user");

        assert!(!user.enabled);
        assert!(!user.account_non_locked);
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage.create_user_impl(new_user("ada")).await.expect("user");

        let mut duplicate = new_user("ada");
        duplicate.email = "other@lbu.ac.uk".to_string();
        let err = storage.create_user_impl(duplicate).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_activation_enables_user_and_consumes_token() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let user = storage.create_user_impl(new_user("grace")).await.expect("user");

        storage
            .replace_activation_impl(&user.id, "first")
            .await
            .expect("activation");
        let activation = storage
            .replace_activation_impl(&user.id, "second")
            .await
            .expect("activation");
        assert!(
            storage
                .get_activation_by_token_impl("first")
                .await
                .expect("query")
                .is_none()
        );

        storage.activate_user_impl(&activation).await.expect("activate");

        let user = storage
            .get_user_by_id_impl(&user.id)
            .await
            .expect("query")
            .expect("user exists");
        assert!(user.enabled && user.account_non_expired && user.credentials_non_expired);
        assert!(
            storage
                .get_activation_by_user_impl(&user.id)
                .await
                .expect("query")
                .is_none()
        );
    }
}
