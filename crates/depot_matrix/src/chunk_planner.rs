use std::ops::Range;

use crate::error::MatrixError;

/// A rectangle of the origin × destination index space sent as one request.
///
/// In the request payload the chunk's origins come first, followed by its
/// destinations, so `source_positions` is `0..origins` and `target_positions`
/// continues right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    origins: Range<usize>,
    destinations: Range<usize>,
}

impl Chunk {
    pub fn new(origins: Range<usize>, destinations: Range<usize>) -> Self {
        Self {
            origins,
            destinations,
        }
    }

    pub fn origins(&self) -> Range<usize> {
        self.origins.clone()
    }

    pub fn destinations(&self) -> Range<usize> {
        self.destinations.clone()
    }

    pub fn num_origins(&self) -> usize {
        self.origins.len()
    }

    pub fn num_destinations(&self) -> usize {
        self.destinations.len()
    }

    /// Total number of coordinates in the request payload
    pub fn num_coordinates(&self) -> usize {
        self.num_origins() + self.num_destinations()
    }

    pub fn source_positions(&self) -> Range<usize> {
        0..self.num_origins()
    }

    pub fn target_positions(&self) -> Range<usize> {
        self.num_origins()..self.num_coordinates()
    }
}

/// Each side gets half of the combined budget, regardless of how many origins
/// and destinations there are.
pub fn chunk_size(max_combined: usize) -> Result<usize, MatrixError> {
    if max_combined < 2 {
        return Err(MatrixError::Configuration(format!(
            "max_combined must be at least 2, got {max_combined}"
        )));
    }

    Ok(max_combined / 2)
}

fn strides(count: usize, step: usize) -> impl Iterator<Item = Range<usize>> {
    (0..count)
        .step_by(step)
        .map(move |start| start..(start + step).min(count))
}

/// Splits `num_origins × num_destinations` into chunks of at most
/// `max_combined` coordinates. Chunks are ordered origin-major and tile the
/// index space exactly once.
pub fn plan(
    num_origins: usize,
    num_destinations: usize,
    max_combined: usize,
) -> Result<Vec<Chunk>, MatrixError> {
    let size = chunk_size(max_combined)?;

    if num_origins == 0 || num_destinations == 0 {
        return Ok(Vec::new());
    }

    let chunks = strides(num_origins, size)
        .flat_map(|origins| {
            strides(num_destinations, size)
                .map(move |destinations| Chunk::new(origins.clone(), destinations))
        })
        .collect();

    Ok(chunks)
}
