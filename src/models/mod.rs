mod analysis;
mod document;
mod quote;
mod wizard;

pub use analysis::{
    Financial, MonthlyProduction, Production, QuoteAnalysisEntry, Recommendations, ResultsView,
    SAVINGS_PROJECTION_YEARS, SavingsPoint, SolarAnalysisResult, Visualizations,
};
pub use document::{DocumentKind, UploadedDocument};
pub use quote::{
    Location, PersonalInfo, QuoteId, QuoteRequest, QuoteStatus, QuoteSummary, QuotesResponse,
};
pub use wizard::{
    AddressForm, PersonalInfoForm, QuotesQuery, ResultsQuery, StepData, StepDescriptor, StepQuery,
    SubmitResponse, TOTAL_STEPS, ThankYouQuery, ThankYouView,
};
