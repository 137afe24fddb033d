pub mod activation;
pub mod attention;
pub mod conv;
pub mod dropout;
pub mod flatten;
pub mod gan;
pub mod linear;
pub mod pooling;
pub mod rnn;
pub mod sequential;
pub mod transformer;
