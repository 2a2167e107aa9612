//! 课程存储操作

use super::{SeaOrmStorage, db_error, new_id};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::Result;
use crate::models::courses::entities::{Course, CourseFields};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, fields: CourseFields) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(new_id()),
            title: Set(fields.title),
            description: Set(fields.description),
            fees: Set(fields.fees),
            duration_in_days: Set(fields.duration_in_days),
            instructor: Set(fields.instructor),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建课程失败"))?;
        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: &str) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error("查询课程失败"))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 列出全部课程
    pub async fn list_courses_impl(&self) -> Result<Vec<Course>> {
        let result = Courses::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await
            .map_err(db_error("查询课程列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 批量获取课程
    pub async fn list_courses_by_ids_impl(&self, ids: &[String]) -> Result<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Courses::find()
            .filter(Column::Id.is_in(ids.iter().cloned()))
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await
            .map_err(db_error("批量查询课程失败"))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: &str,
        fields: CourseFields,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id.to_string()),
            title: Set(fields.title),
            description: Set(fields.description),
            fees: Set(fields.fees),
            duration_in_days: Set(fields.duration_in_days),
            instructor: Set(fields.instructor),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model.update(&self.db).await.map_err(db_error("更新课程失败"))?;
        Ok(Some(updated.into_course()))
    }

    /// 删除课程
    pub async fn delete_course_impl(&self, id: &str) -> Result<bool> {
        let result = Courses::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_error("删除课程失败"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn fields(title: &str) -> CourseFields {
        CourseFields {
            title: title.to_string(),
            description: "An introduction".to_string(),
            fees: Decimal::new(50000, 2),
            duration_in_days: 30,
            instructor: Some("Dr. Hopper".to_string()),
        }
    }

    #[tokio::test]
    async fn test_course_crud() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let course = storage.create_course_impl(fields("Compilers")).await.expect("create");

        let fetched = storage
            .get_course_by_id_impl(&course.id)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(fetched.title, "Compilers");
        assert_eq!(fetched.fees, Decimal::new(500, 0));

        let updated = storage
            .update_course_impl(&course.id, fields("Advanced Compilers"))
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(updated.title, "Advanced Compilers");

        assert!(storage.delete_course_impl(&course.id).await.expect("delete"));
        assert!(!storage.delete_course_impl(&course.id).await.expect("delete"));
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage.create_course_impl(fields("Databases")).await.expect("create");
        let err = storage
            .create_course_impl(fields("Databases"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_list_by_ids_skips_unknown() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let a = storage.create_course_impl(fields("Algebra")).await.expect("create");
        storage.create_course_impl(fields("Biology")).await.expect("create");

        let found = storage
            .list_courses_by_ids_impl(&[a.id.clone(), new_id()])
            .await
            .expect("query");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a.id);
    }
}
