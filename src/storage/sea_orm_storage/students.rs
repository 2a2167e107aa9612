//! 学生与选课存储操作

use super::{SeaOrmStorage, db_error, new_id};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::students::{ActiveModel, Column, Entity as Students, Model};
use crate::errors::Result;
use crate::models::students::entities::{Student, StudentProfile};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    async fn load_student<C: ConnectionTrait>(conn: &C, model: Model) -> Result<Student> {
        let course_hrefs = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(model.id.clone()))
            .order_by_asc(EnrollmentColumn::CourseHref)
            .all(conn)
            .await
            .map_err(db_error("查询选课记录失败"))?
            .into_iter()
            .map(|e| e.course_href)
            .collect();

        Ok(model.into_student(course_hrefs))
    }

    /// 创建学生并登记首门课程
    pub async fn create_student_with_enrollment_impl(
        &self,
        auth_user_href: &str,
        course_href: &str,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let student = ActiveModel {
            id: Set(new_id()),
            address: Set(None),
            emergency_contact: Set(None),
            date_of_birth: Set(None),
            phone_contact: Set(None),
            auth_user_href: Set(auth_user_href.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_error("创建学生失败"))?;

        EnrollmentActiveModel {
            id: Set(new_id()),
            student_id: Set(student.id.clone()),
            course_href: Set(course_href.to_string()),
        }
        .insert(&txn)
        .await
        .map_err(db_error("创建选课记录失败"))?;

        let student = Self::load_student(&txn, student).await?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(student)
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: &str) -> Result<Option<Student>> {
        let result = Students::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        match result {
            Some(model) => Ok(Some(Self::load_student(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    /// 通过 authUserHref 获取学生
    pub async fn get_student_by_auth_href_impl(
        &self,
        auth_user_href: &str,
    ) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::AuthUserHref.eq(auth_user_href))
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        match result {
            Some(model) => Ok(Some(Self::load_student(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    /// 登记课程
    pub async fn add_enrollment_impl(&self, student_id: &str, course_href: &str) -> Result<bool> {
        let existing = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::CourseHref.eq(course_href))
            .count(&self.db)
            .await
            .map_err(db_error("查询选课记录失败"))?;
        if existing > 0 {
            return Ok(false);
        }

        let inserted = EnrollmentActiveModel {
            id: Set(new_id()),
            student_id: Set(student_id.to_string()),
            course_href: Set(course_href.to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(db_error("创建选课记录失败"));

        match inserted {
            Ok(_) => Ok(true),
            // 并发登记同一课程
            Err(e) if e.is_unique_violation() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// 撤销登记
    pub async fn remove_enrollment_impl(&self, student_id: &str, course_href: &str) -> Result<()> {
        Enrollments::delete_many()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::CourseHref.eq(course_href))
            .exec(&self.db)
            .await
            .map_err(db_error("删除选课记录失败"))?;
        Ok(())
    }

    /// 删除学生，选课记录级联删除
    pub async fn delete_student_impl(&self, id: &str) -> Result<bool> {
        let result = Students::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_error("删除学生失败"))?;
        Ok(result.rows_affected > 0)
    }

    /// 更新学生资料
    pub async fn update_student_profile_impl(
        &self,
        auth_user_href: &str,
        profile: StudentProfile,
    ) -> Result<Option<Student>> {
        let existing = Students::find()
            .filter(Column::AuthUserHref.eq(auth_user_href))
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.address = Set(Some(profile.address));
        model.emergency_contact = Set(Some(profile.emergency_contact));
        model.date_of_birth = Set(Some(profile.date_of_birth.format("%Y-%m-%d").to_string()));
        model.phone_contact = Set(Some(profile.phone_contact));
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model.update(&self.db).await.map_err(db_error("更新学生失败"))?;
        Ok(Some(Self::load_student(&self.db, updated).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HREF: &str = "/auth/user/0f8fad5b-d9cb-469f-a165-70867728950e";

    #[tokio::test]
    async fn test_enrollment_is_idempotent() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let student = storage
            .create_student_with_enrollment_impl(HREF, "/courses/a")
            .await
            .expect("create");
        assert_eq!(student.course_hrefs, vec!["/courses/a".to_string()]);

        assert!(!storage.add_enrollment_impl(&student.id, "/courses/a").await.expect("add"));
        assert!(storage.add_enrollment_impl(&student.id, "/courses/b").await.expect("add"));

        let student = storage
            .get_student_by_auth_href_impl(HREF)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(student.course_hrefs.len(), 2);
    }

    #[tokio::test]
    async fn test_auth_href_is_unique() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage
            .create_student_with_enrollment_impl(HREF, "/courses/a")
            .await
            .expect("create");
        let err = storage
            .create_student_with_enrollment_impl(HREF, "/courses/b")
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage
            .create_student_with_enrollment_impl(HREF, "/courses/a")
            .await
            .expect("create");

        let dob = chrono::NaiveDate::from_ymd_opt(2001, 5, 17).expect("valid date");
        let student = storage
            .update_student_profile_impl(
                HREF,
                StudentProfile {
                    address: "1 Headingley Lane".into(),
                    emergency_contact: "Jane".into(),
                    date_of_birth: dob,
                    phone_contact: "0113 000 0000".into(),
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(student.date_of_birth, Some(dob));
        assert_eq!(student.course_hrefs.len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_student_removes_enrollments() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let student = storage
            .create_student_with_enrollment_impl(HREF, "/courses/a")
            .await
            .expect("create");
        storage
            .add_enrollment_impl(&student.id, "/courses/b")
            .await
            .expect("add");

        assert!(storage.delete_student_impl(&student.id).await.expect("delete"));

        let remaining = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student.id.clone()))
            .count(&storage.db)
            .await
            .expect("count");
        assert_eq!(remaining, 0);
    }
}
