pub mod deliverable_service;

pub use deliverable_service::DeliverableService;
