pub mod bucket_archive;
pub mod gemini_service;
pub mod local_archive;
pub mod openai_service;

pub use bucket_archive::BucketArchive;
pub use gemini_service::GeminiService;
pub use local_archive::LocalArchive;
pub use openai_service::OpenAiService;
