mod complaint_repository;
#[cfg(test)]
mod memory;

pub use complaint_repository::{ComplaintRepository, PgComplaintRepository};
#[cfg(test)]
pub use memory::InMemoryComplaintRepository;
