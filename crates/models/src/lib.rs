pub mod errors;
pub mod db;
pub mod person;

#[cfg(test)]
mod tests;
