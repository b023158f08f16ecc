pub mod customer_repo;
pub mod inventory_repo;
pub mod menu_repo;
pub mod order_repo;
pub mod reservation_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use customer_repo::{CustomerRepository, InMemoryCustomerRepository};
pub use inventory_repo::{InMemoryInventoryRepository, InventoryRepository};
pub use menu_repo::{InMemoryMenuRepository, MenuRepository};
pub use order_repo::{InMemoryOrderRepository, OrderRepository};
pub use reservation_repo::{InMemoryReservationRepository, ReservationRepository};
pub use transaction_repo::{InMemoryTransactionRepository, TransactionRepository};
pub use user_repo::{InMemoryUserRepository, UserRepository};
