pub struct UserCreateRequest {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub gender: String,
    pub mobile_no: String,
    pub signup_type: String,
}
