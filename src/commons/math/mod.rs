//! Mathematical tools shared by the encryption and evaluation layers.

pub mod decomposition;
pub mod random;
