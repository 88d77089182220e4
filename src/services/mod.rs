mod quote;

pub use quote::QuoteService;
