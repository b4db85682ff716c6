pub mod blackbody;
pub mod gray;

pub use blackbody::{photon_flux, spotted_photon_flux};
pub use gray::{GrayAtmosphereParameters, GrayAtmosphereSolver, GrayOpacity};
