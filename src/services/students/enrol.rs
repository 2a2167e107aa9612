//! 选课流程
//!
//! 已有学生：登记课程，取课程信息，向财务服务开学费账单。
//! 新学生：保存学生与首门课程，升级认证用户为学生，再用新令牌
//! 取课程信息、创建图书馆学生、开学费账单。
//! 任一下游调用失败时撤销本地写入（跨服务不保证一致）。

use actix_web::{HttpRequest, HttpResponse};
use rust_decimal::prelude::ToPrimitive;
use tracing::{error, info, warn};

use crate::clients::ServiceClients;
use crate::middlewares::{AuthToken, RequireJWT};
use crate::models::finance::entities::InvoiceType;
use crate::models::finance::requests::{AccountRequest, InvoiceRequest};
use crate::models::students::errors::StudentErrorCode;
use crate::models::students::requests::EnrolmentRequest;
use crate::models::students::responses::StudentDto;
use crate::models::{ApiError, ApiResult, CommonErrorCode};
use crate::storage::Storage;
use crate::utils::validate::{normalize_course_href, parse_auth_user_href};

use super::StudentService;

pub async fn create_enrolment(
    service: &StudentService,
    request: &HttpRequest,
    enrolment: EnrolmentRequest,
) -> ApiResult<HttpResponse> {
    let course_href = enrolment
        .course_href
        .ok_or(CommonErrorCode::InvalidHref)?;
    let auth_user_href = enrolment
        .auth_user_href
        .ok_or(CommonErrorCode::InvalidHref)?;
    let course_href = normalize_course_href(&course_href)?;
    parse_auth_user_href(&auth_user_href)?;

    RequireJWT::validate_auth_user_href(request, &auth_user_href)?;
    let token = RequireJWT::require_token(request)?;

    let storage = service.get_storage(request)?;
    let clients = service.get_clients(request)?;

    match storage.get_student_by_auth_href(&auth_user_href).await? {
        Some(student) => {
            if !storage.add_enrollment(&student.id, &course_href).await? {
                return Err(StudentErrorCode::CourseAlreadyEnrolled.into());
            }
            info!("student [{}] enrolled in {}", student.id, course_href);

            if let Err(e) =
                bill_course(&clients, &course_href, &auth_user_href, &token).await
            {
                warn!("rolling back enrollment of [{}] in {}", student.id, course_href);
                storage.remove_enrollment(&student.id, &course_href).await?;
                return Err(e);
            }

            let student = storage
                .get_student_by_id(&student.id)
                .await?
                .ok_or(StudentErrorCode::StudentNotFound)?;
            Ok(HttpResponse::Ok().json(StudentDto::from(student)))
        }
        None => {
            let student = storage
                .create_student_with_enrollment(&auth_user_href, &course_href)
                .await?;
            info!("created student [{}] for {}", student.id, auth_user_href);

            match register_new_student(&clients, &course_href, &auth_user_href, &token).await {
                Ok(jwt_token_dto) => {
                    let mut dto = StudentDto::from(student);
                    dto.jwt_token_dto = Some(jwt_token_dto);
                    Ok(HttpResponse::Ok().json(dto))
                }
                Err(e) => {
                    warn!("rolling back new student [{}]", student.id);
                    rollback_student(storage.as_ref(), &student.id).await?;
                    Err(e)
                }
            }
        }
    }
}

async fn rollback_student(storage: &dyn Storage, student_id: &str) -> ApiResult<()> {
    storage.delete_student(student_id).await?;
    Ok(())
}

/// 新学生的下游调用，返回升级后的令牌
async fn register_new_student(
    clients: &ServiceClients,
    course_href: &str,
    auth_user_href: &str,
    token: &AuthToken,
) -> ApiResult<crate::models::auth::responses::JwtTokenDto> {
    let upgraded = clients
        .auth
        .upgrade_user(auth_user_href, token)
        .await
        .map_err(|e| {
            error!("auth service upgrade failed: {}", e);
            ApiError::from(StudentErrorCode::AuthServiceFailed)
        })?;
    let student_token = AuthToken(upgraded.jwt_token.clone());

    let course = fetch_course(clients, course_href, &student_token).await?;

    clients
        .library
        .create_student(&student_token)
        .await
        .map_err(|e| {
            error!("library service student creation failed: {}", e);
            ApiError::from(StudentErrorCode::LibraryServiceFailed)
        })?;

    post_tuition_invoice(clients, &course, auth_user_href, &student_token).await?;

    Ok(upgraded)
}

/// 已有学生选新课：取课程并开账单
async fn bill_course(
    clients: &ServiceClients,
    course_href: &str,
    auth_user_href: &str,
    token: &AuthToken,
) -> ApiResult<()> {
    let course = fetch_course(clients, course_href, token).await?;
    post_tuition_invoice(clients, &course, auth_user_href, token).await
}

async fn fetch_course(
    clients: &ServiceClients,
    course_href: &str,
    token: &AuthToken,
) -> ApiResult<crate::models::courses::responses::CourseDto> {
    clients
        .course
        .get_course(course_href, token)
        .await
        .map_err(|e| {
            error!("course service lookup failed for {}: {}", course_href, e);
            StudentErrorCode::CourseServiceFailed.into()
        })
}

/// 学费账单：金额为课程费用，到期日为今天加课程天数
pub(crate) fn tuition_invoice(
    course: &crate::models::courses::responses::CourseDto,
    today: chrono::NaiveDate,
) -> Result<InvoiceRequest, StudentErrorCode> {
    let due_date = chrono::Duration::try_days(i64::from(course.duration_in_days))
        .and_then(|duration| today.checked_add_signed(duration))
        .ok_or(StudentErrorCode::InvalidDetails)?;
    Ok(InvoiceRequest {
        amount: course.fees.to_f64().unwrap_or_default(),
        due_date,
        invoice_type: InvoiceType::TuitionFees,
    })
}

async fn post_tuition_invoice(
    clients: &ServiceClients,
    course: &crate::models::courses::responses::CourseDto,
    auth_user_href: &str,
    token: &AuthToken,
) -> ApiResult<()> {
    let invoice = tuition_invoice(course, chrono::Utc::now().date_naive())?;
    let account = AccountRequest {
        auth_user_href: Some(auth_user_href.to_string()),
        invoice_list: vec![invoice],
    };

    clients
        .finance
        .create_account(&account, token)
        .await
        .map_err(|e| {
            error!("finance service invoice creation failed: {}", e);
            ApiError::from(StudentErrorCode::FinanceServiceFailed)
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::responses::CourseDto;
    use rust_decimal::Decimal;

    #[test]
    fn test_tuition_invoice() {
        let course = CourseDto {
            id_href: "/courses/x".into(),
            title: "Algorithms".into(),
            description: "Sorting".into(),
            fees: Decimal::new(150025, 2),
            duration_in_days: 30,
            instructor: None,
        };
        let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 15).expect("date");
        let invoice = tuition_invoice(&course, today).expect("invoice");

        assert_eq!(invoice.amount, 1500.25);
        assert_eq!(
            invoice.due_date,
            chrono::NaiveDate::from_ymd_opt(2025, 2, 14).expect("date")
        );
        assert_eq!(invoice.invoice_type, InvoiceType::TuitionFees);
    }

    #[test]
    fn test_tuition_invoice_rejects_unrepresentable_due_date() {
        let course = CourseDto {
            id_href: "/courses/x".into(),
            title: "Forever".into(),
            description: "Never ends".into(),
            fees: Decimal::new(100, 0),
            duration_in_days: i32::MAX,
            instructor: None,
        };
        let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 15).expect("date");
        assert_eq!(
            tuition_invoice(&course, today).unwrap_err(),
            StudentErrorCode::InvalidDetails
        );
    }
}
