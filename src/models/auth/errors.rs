use crate::define_error_codes;

define_error_codes! {
    /// 认证服务错误
    AuthErrorCode {
        AccountNotActivated = (4000, "The account is not activated. Please activate it before logging in."),
        CredentialsExpired = (4001, "The account credentials have expired. Please reset your credentials."),
        AccountLocked = (4002, "The account credentials are locked. Please wait 24 hours before attempting to log in again."),
        BadCredentials = (4003, "The username or password provided is invalid. Please try again with the correct username and password."),
        UsernameNotFound = (4004, "The provided username does not exist. Please create a new account or use a valid username."),
        UserIdNotFound = (4005, "The provided user id does not exist."),
        UserAlreadyExists = (4006, "The provided username or email already available."),
        AccountAlreadyActivated = (5000, "Given account already activated."),
        ActivationStillUsable = (5001, "Existing account activation link still usable please use it to activate."),
        ActivationTokenExpired = (5002, "Given token is expired."),
        ActivationTokenInvalid = (5003, "Given token is invalid."),
        InvalidCredentials = (7000, "Invalid credentials provided."),
        EmailSendingFailed = (8000, "Email sending failed."),
    }
}

define_error_codes! {
    /// 认证服务成功消息
    AuthSuccessCode {
        AccountActivated = (2000, "Account successfully activated."),
        ActivationResent = (2001, "Sending activation token again."),
        TokenValid = (2002, "Given jwt token is valid."),
    }
}
