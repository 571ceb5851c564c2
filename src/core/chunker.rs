//! Partitioning of an organism list into fixed-size chunks

use crate::domain::{ChadoGffError, Chunk, OrganismId, Result, MAX_CHUNKS};

/// Splits `organisms` into ordered, contiguous chunks of at most `slice_size`
///
/// Every chunk but the last holds exactly `slice_size` organisms; the last
/// holds between 1 and `slice_size`. An empty list yields no chunks.
///
/// # Errors
///
/// Returns a configuration error when `slice_size` is zero, or when the list
/// would need more than [`MAX_CHUNKS`] chunks.
///
/// # Examples
///
/// ```
/// use chado_gff::core::chunker::partition;
/// use chado_gff::domain::ids::organism_list;
///
/// let organisms = organism_list(&["Pberghei", "Pchabaudi", "Pfalciparum"]).unwrap();
/// let chunks = partition(&organisms, 2).unwrap();
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[1].organisms()[0].as_str(), "Pfalciparum");
/// ```
pub fn partition(organisms: &[OrganismId], slice_size: usize) -> Result<Vec<Chunk>> {
    if slice_size == 0 {
        return Err(ChadoGffError::Configuration(
            "slice_size must be >= 1".to_string(),
        ));
    }

    let chunk_count = organisms.len().div_ceil(slice_size);
    if chunk_count > MAX_CHUNKS {
        return Err(ChadoGffError::Configuration(format!(
            "{} organisms at slice_size {} need {} chunks, more than the limit of {}",
            organisms.len(),
            slice_size,
            chunk_count,
            MAX_CHUNKS
        )));
    }

    let mut chunks = Vec::with_capacity(chunk_count);
    let mut current: Vec<OrganismId> = Vec::with_capacity(slice_size);

    for organism in organisms {
        current.push(organism.clone());
        if current.len() == slice_size {
            let members = std::mem::replace(&mut current, Vec::with_capacity(slice_size));
            chunks.push(close_chunk(chunks.len(), members)?);
        }
    }

    if !current.is_empty() {
        chunks.push(close_chunk(chunks.len(), current)?);
    }

    tracing::debug!(
        organisms = organisms.len(),
        slice_size,
        chunks = chunks.len(),
        "Partitioned organism list"
    );

    Ok(chunks)
}

fn close_chunk(index: usize, members: Vec<OrganismId>) -> Result<Chunk> {
    Chunk::new(index, members).map_err(ChadoGffError::Validation)
}
