//! Page Components

mod studio;

pub use studio::StudioPage;
