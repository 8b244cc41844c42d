use once_cell::sync::Lazy;
use regex::Regex;

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 5..=16;

static USERNAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("username pattern"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern")
});

/// 5~16 位，仅字母、数字、下划线与连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !USERNAME_LEN.contains(&username.len()) {
        Err("Username length must be between 5 and 16 characters")
    } else if !USERNAME_CHARS.is_match(username) {
        Err("Username must contain only letters, numbers, underscores or hyphens")
    } else {
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 可接受的 UTC 偏移范围（分钟）
pub const MIN_UTC_OFFSET: i32 = -720;
pub const MAX_UTC_OFFSET: i32 = 840;

pub fn validate_utc_offset(minutes: i32) -> Result<(), &'static str> {
    if !(MIN_UTC_OFFSET..=MAX_UTC_OFFSET).contains(&minutes) {
        return Err("UTC offset must be between -720 and 840 minutes");
    }
    // 现实中的时区偏移都是 15 分钟的整数倍
    if minutes % 15 != 0 {
        return Err("UTC offset must be a multiple of 15 minutes");
    }
    Ok(())
}

/// 三位大写字母的货币代码，如 USD
pub fn validate_currency(code: &str) -> Result<(), &'static str> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err("Currency must be a 3-letter uppercase ISO 4217 code");
    }
    Ok(())
}

const MIN_PASSWORD_LEN: usize = 8;
// argon2 对超长输入计算开销大
const MAX_PASSWORD_LEN: usize = 128;

const COMMON_PASSWORDS: &[&str] = &[
    "password1",
    "12345678",
    "qwerty123",
    "abcd1234",
    "letmein1",
    "guitar123",
    "piano1234",
];

type CharRule = (fn(&char) -> bool, &'static str);

const CHAR_RULES: &[CharRule] = &[
    (char::is_ascii_uppercase, "an uppercase letter"),
    (char::is_ascii_lowercase, "a lowercase letter"),
    (char::is_ascii_digit, "a digit"),
];

/// 密码需 8~128 字符，包含大小写字母与数字，且不在常见密码表中
///
/// 所有不满足的规则合并成一条消息返回
pub fn validate_password(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters long"
        ));
    }

    let missing: Vec<&str> = CHAR_RULES
        .iter()
        .filter(|(rule, _)| !password.chars().any(|c| rule(&c)))
        .map(|(_, what)| *what)
        .collect();
    if !missing.is_empty() {
        return Err(format!("Password must contain {}", missing.join(", ")));
    }

    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        return Err("Password is too common, please choose a stronger password".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("tutor_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("bad name!").is_err());
        assert!(validate_email("ana@academy.io").is_ok());
        assert!(validate_email("ana.academy.io").is_err());
    }

    #[test]
    fn test_utc_offset_bounds() {
        assert!(validate_utc_offset(0).is_ok());
        assert!(validate_utc_offset(-720).is_ok());
        assert!(validate_utc_offset(840).is_ok());
        assert!(validate_utc_offset(345).is_ok());
        assert!(validate_utc_offset(841).is_err());
        assert!(validate_utc_offset(-721).is_err());
        assert!(validate_utc_offset(10).is_err());
    }

    #[test]
    fn test_currency_code() {
        assert!(validate_currency("USD").is_ok());
        assert!(validate_currency("usd").is_err());
        assert!(validate_currency("EURO").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("S3cret-Pass").is_ok());
        assert!(validate_password("Ab1").is_err());
        assert!(validate_password(&"Aa1".repeat(50)).is_err());
        assert!(validate_password("GUITAR123").is_err());
        assert!(validate_password("Guitar123").is_err());
    }

    #[test]
    fn test_password_lists_every_missing_class() {
        let err = validate_password("longenough").unwrap_err();
        assert_eq!(err, "Password must contain an uppercase letter, a digit");
    }
}
