pub mod ai_service;
pub mod extract_service;
pub mod log_service;
pub mod quiz_service;
pub mod tutor_service;
