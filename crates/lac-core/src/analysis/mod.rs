//! Segmentation and POS tagging with the exported model

mod custom;
mod lac;
mod predictor;
mod segment;
mod tag;

pub use custom::{Customization, Trie};
pub use lac::{Lac, Predictor, UNKNOWN_TAG};
pub use predictor::PaddlePredictor;
pub use segment::{decode_segments, pos_tags, words, Offset, Segment, Segments};
pub use tag::Tag;
