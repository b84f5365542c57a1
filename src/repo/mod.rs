pub mod history_repo;

pub use history_repo::HistoryRepository;
