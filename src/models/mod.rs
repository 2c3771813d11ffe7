pub mod citizen;
pub mod feedback;
pub mod report;
pub mod reservation;
