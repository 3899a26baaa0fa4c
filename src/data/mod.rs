pub mod migrations;
pub mod models;
pub mod repositories;

#[cfg(test)]
pub mod test_support;
