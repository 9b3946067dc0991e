use super::model::{StoreError, StoreResult};

/// Number of partitions documents are spread over.
pub const PARTITION_COUNT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movie,
    Actor,
}

impl EntityKind {
    /// Two-letter prefix every id of this kind starts with.
    pub fn id_prefix(self) -> &'static str {
        match self {
            EntityKind::Movie => "tt",
            EntityKind::Actor => "nm",
        }
    }

    /// Table holding the documents of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Movie => "movies",
            EntityKind::Actor => "actors",
        }
    }

    /// Column list selected for documents of this kind.
    pub fn columns(self) -> &'static str {
        match self {
            EntityKind::Movie => {
                "id, partition_key, title, genres, year, runtime, rating, votes, top_rated, cast_ids, text_search"
            }
            EntityKind::Actor => {
                "id, partition_key, name, birth_year, death_year, professions, movies, text_search"
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Actor => "actor",
        }
    }
}

/// Derive the partition key of a document from its id alone.
///
/// Ids look like `tt0133093` or `nm0000206`: the kind prefix followed by
/// digits, more than five characters in total. The key is the numeric part
/// modulo [`PARTITION_COUNT`].
pub fn partition_key(kind: EntityKind, id: &str) -> StoreResult<String> {
    let malformed = || StoreError::MalformedIdentifier(id.to_string());

    if id.len() <= 5 {
        return Err(malformed());
    }

    let digits = id.strip_prefix(kind.id_prefix()).ok_or_else(malformed)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let value: u64 = digits.parse().map_err(|_| malformed())?;
    Ok((value % PARTITION_COUNT).to_string())
}
