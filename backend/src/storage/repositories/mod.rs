pub mod user_repository;
pub mod category_repository;
pub mod transaction_repository;
pub mod budget_repository;
pub mod session_repository;

pub use user_repository::UserRepository;
pub use category_repository::CategoryRepository;
pub use transaction_repository::TransactionRepository;
pub use budget_repository::BudgetRepository;
pub use session_repository::SessionRepository;
