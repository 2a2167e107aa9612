use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CommonErrorCode;

const UUID_PATTERN: &str =
    r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}";

static UUID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{UUID_PATTERN}$")).expect("Invalid uuid regex"));

// href 只校验结构，id 部分交给 UUID_RE
static COURSE_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/courses/([^/]+)$").expect("Invalid course href regex"));

static AUTH_USER_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/auth/user/([^/]+)$").expect("Invalid auth user href regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn is_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

/// 校验 UUID，失败返回 9001
pub fn validate_uuid(value: &str) -> Result<&str, CommonErrorCode> {
    if is_uuid(value) {
        Ok(value)
    } else {
        Err(CommonErrorCode::InvalidUuid)
    }
}

fn parse_href<'a>(re: &Regex, href: &'a str) -> Result<&'a str, CommonErrorCode> {
    let id = re
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(CommonErrorCode::InvalidHref)?;
    validate_uuid(id)
}

/// 从 `/courses/{id}` 中取出课程 ID
pub fn parse_course_href(href: &str) -> Result<&str, CommonErrorCode> {
    parse_href(&COURSE_HREF_RE, href)
}

/// 课程 href 统一为小写 id，大小写不同的 href 视为同一门课程
pub fn normalize_course_href(href: &str) -> Result<String, CommonErrorCode> {
    let id = parse_course_href(href)?;
    Ok(format!("/courses/{}", id.to_ascii_lowercase()))
}

/// 从 `/auth/user/{id}` 中取出用户 ID
pub fn parse_auth_user_href(href: &str) -> Result<&str, CommonErrorCode> {
    parse_href(&AUTH_USER_HREF_RE, href)
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "9b2d3f4a-1c2e-4a5b-8c7d-0e1f2a3b4c5d";

    #[test]
    fn test_uuid() {
        assert!(is_uuid(ID));
        assert!(!is_uuid("9b2d3f4a"));
        assert_eq!(validate_uuid("nope"), Err(CommonErrorCode::InvalidUuid));
    }

    #[test]
    fn test_course_href() {
        assert_eq!(parse_course_href(&format!("/courses/{ID}")), Ok(ID));
        assert_eq!(
            parse_course_href(&format!("/course/{ID}")),
            Err(CommonErrorCode::InvalidHref)
        );
        assert_eq!(
            parse_course_href(&format!("/courses/{ID}/extra")),
            Err(CommonErrorCode::InvalidHref)
        );
        assert_eq!(
            parse_course_href("/courses/123"),
            Err(CommonErrorCode::InvalidUuid)
        );
    }

    #[test]
    fn test_normalize_course_href() {
        assert_eq!(
            normalize_course_href(&format!("/courses/{}", ID.to_ascii_uppercase())),
            Ok(format!("/courses/{ID}"))
        );
        assert!(normalize_course_href("/courses/nope").is_err());
    }

    #[test]
    fn test_auth_user_href() {
        assert_eq!(parse_auth_user_href(&format!("/auth/user/{ID}")), Ok(ID));
        assert_eq!(
            parse_auth_user_href(&format!("/courses/{ID}")),
            Err(CommonErrorCode::InvalidHref)
        );
        assert_eq!(parse_auth_user_href(""), Err(CommonErrorCode::InvalidHref));
    }

    #[test]
    fn test_email() {
        assert!(validate_email("student@lbu.ac.uk").is_ok());
        assert!(validate_email("student.lbu.ac.uk").is_err());
    }
}
