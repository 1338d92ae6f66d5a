pub mod deliverable_repo;

pub use deliverable_repo::DeliverableRepository;
