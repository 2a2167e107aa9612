use rust_decimal::Decimal;
use serde::Deserialize;

use super::entities::CourseFields;
use super::errors::CourseErrorCode;

// 课程最长 10 年
pub const MAX_DURATION_IN_DAYS: i32 = 3650;

// 创建 / 更新课程请求，更新时需携带 idHref
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub id_href: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub fees: Option<Decimal>,
    pub duration_in_days: Option<i32>,
    pub instructor: Option<String>,
}

impl CourseRequest {
    /// 校验必填字段
    pub fn into_fields(self) -> Result<CourseFields, CourseErrorCode> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let description = self.description.filter(|d| !d.trim().is_empty());
        match (title, description, self.fees, self.duration_in_days) {
            (Some(title), Some(description), Some(fees), Some(duration_in_days))
                if fees >= Decimal::ZERO
                    && (0..=MAX_DURATION_IN_DAYS).contains(&duration_in_days) =>
            {
                Ok(CourseFields {
                    title,
                    description,
                    fees,
                    duration_in_days,
                    instructor: self.instructor,
                })
            }
            _ => Err(CourseErrorCode::InvalidCourseDetails),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CourseRequest {
        CourseRequest {
            id_href: None,
            title: Some("Distributed Systems".into()),
            description: Some("Consensus and replication".into()),
            fees: Some(Decimal::new(125050, 2)),
            duration_in_days: Some(90),
            instructor: None,
        }
    }

    #[test]
    fn test_complete_request_is_accepted() {
        let fields = request().into_fields().expect("valid request");
        assert_eq!(fields.fees, Decimal::new(125050, 2));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut req = request();
        req.title = Some("  ".into());
        assert_eq!(
            req.into_fields().unwrap_err(),
            CourseErrorCode::InvalidCourseDetails
        );

        let mut req = request();
        req.fees = None;
        assert!(req.into_fields().is_err());
    }

    #[test]
    fn test_duration_is_bounded() {
        let mut req = request();
        req.duration_in_days = Some(MAX_DURATION_IN_DAYS);
        assert!(req.into_fields().is_ok());

        let mut req = request();
        req.duration_in_days = Some(2_000_000_000);
        assert_eq!(
            req.into_fields().unwrap_err(),
            CourseErrorCode::InvalidCourseDetails
        );

        let mut req = request();
        req.duration_in_days = Some(-1);
        assert!(req.into_fields().is_err());
    }

    #[test]
    fn test_fees_deserialize_from_number() {
        let req: CourseRequest =
            serde_json::from_str(r#"{"title":"A","description":"B","fees":99.5,"durationInDays":3}"#)
                .expect("valid json");
        assert_eq!(req.fees, Some(Decimal::new(995, 1)));
    }
}
