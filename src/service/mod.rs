//! Domain services: identity registration, trip-end fan-out and the
//! outbound mail / push / media collaborators they drive.

pub mod ids;
pub mod mail;
pub mod media;
pub mod push;
pub mod registration;
pub mod trip;
