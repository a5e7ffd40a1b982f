pub mod customer;
pub mod db;
pub mod errors;
pub mod loyalty_card;
pub mod vendor;

#[cfg(test)]
mod tests;
