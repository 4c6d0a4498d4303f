// Adapters layer: concrete implementations for external systems (OCR engines, HTTP).

pub mod http;
pub mod ocr;
