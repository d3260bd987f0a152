pub mod url_validator;

/// 62 进制字母表，随机生成别名
pub fn generate_alias(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 8 位十六进制别名（4 个强随机字节），用于需要更高不可预测性的调用方
pub fn generate_secure_alias() -> String {
    let bytes = uuid::Uuid::new_v4().into_bytes();
    bytes[..4].iter().map(|b| format!("{:02x}", b)).collect()
}
