//! Application use cases (business logic orchestration).

mod movie_modal;

pub use movie_modal::{LoadMovieModal, MovieModalError, MovieModalOutput};
