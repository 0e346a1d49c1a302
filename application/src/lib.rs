pub mod rag_service;
pub mod retriever;
