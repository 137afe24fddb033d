pub mod exp;
pub mod ln;
pub mod pow;
pub mod round;

pub use exp::exp_op;
pub use ln::ln_op;
pub use pow::{pow_scalar_op, sqrt_op};
pub use round::round_op;
