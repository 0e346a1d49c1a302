pub mod chunker;
pub mod completion;
pub mod config;
pub mod document_loader;
pub mod embedder;
pub mod openai_client;
pub mod vector_index;
