use super::*;

mod generate;
mod organize;
mod upload;
