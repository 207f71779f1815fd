//! Configuration module

mod site;

pub use site::FaqConfig;
pub use site::GeminiConfig;
pub use site::HeroConfig;
pub use site::PlanConfig;
pub use site::ScheduleConfig;
pub use site::ScheduleDate;
pub use site::SiteConfig;
pub use site::TestimonialConfig;
