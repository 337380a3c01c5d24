pub mod chi_square;
pub mod config;
pub mod corpus;
pub mod emission;
pub mod error;
pub mod hidden_markov_model;
pub mod markov_chain;
pub mod n_gram;
pub mod types;
pub mod util;
pub mod vocabulary;
