pub use crate::{
    core::{outcome::*, parameters::*, strategy::*},
    models::{demand::*, montecarlo::*},
    stats::{distribution::*, histogram::*, report::*, summary::*},
    utils::errors::*,
};
