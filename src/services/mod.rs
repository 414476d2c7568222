pub mod ai_parsing;
pub mod category_service;
pub mod gemini_service;
pub mod opening_hours_service;
pub mod place_search_service;
pub mod prompts;
pub mod providers;
pub mod recommendation_service;
pub mod schedule_service;
pub mod schedule_stream;
pub mod timing;
pub mod vietmap_service;
