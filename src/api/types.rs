// API response types.
// Defines structs for deserializing PokeAPI responses.

use serde::{Deserialize, Serialize};

/// A `{name, url}` pointer to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One entry of a collection response. Its `name` is the detail path segment.
pub type CollectionReference = NamedResource;

/// Response of `GET pokemon`.
///
/// Only `results` is required. `next`/`previous` are carried but never followed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<CollectionReference>,
}

/// Sprite URLs for a Pokémon. Upstream sends `null` for missing artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
}

/// A type assignment; `slot` 1 is the primary type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Response of `GET pokemon/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub sprites: Sprites,
    pub types: Vec<TypeSlot>,
}

impl Pokemon {
    /// Type names joined with ", " in the order upstream returned them.
    pub fn type_line(&self) -> String {
        self.types
            .iter()
            .map(|t| t.kind.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_page_minimal() {
        let page: CollectionPage = serde_json::from_value(json!({
            "results": [{"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"}]
        }))
        .unwrap();

        assert_eq!(page.count, None);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "bulbasaur");
    }

    #[test]
    fn test_type_line_keeps_upstream_order() {
        let pokemon: Pokemon = serde_json::from_value(json!({
            "id": 6,
            "name": "charizard",
            "sprites": {"front_default": null},
            "types": [
                {"slot": 2, "type": {"name": "flying", "url": "u2"}},
                {"slot": 1, "type": {"name": "fire", "url": "u1"}}
            ]
        }))
        .unwrap();

        assert_eq!(pokemon.type_line(), "flying, fire");
        assert_eq!(pokemon.sprites.front_default, None);
    }

    #[test]
    fn test_pokemon_missing_field_rejected() {
        let result: Result<Pokemon, _> =
            serde_json::from_value(json!({"id": 1, "name": "bulbasaur"}));
        assert!(result.is_err());
    }
}
