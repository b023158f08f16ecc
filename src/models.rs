pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod inventory;
pub mod menu;
pub mod order;
pub mod reservation;

use rust_decimal::Decimal;
use validator::ValidationError;

// ---
// Validações customizadas compartilhadas pelos payloads
// ---
// O `validator` não tem `range` para Decimal, então o "não negativo"
// entra como função custom, igual fazemos para os campos de dinheiro.

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

