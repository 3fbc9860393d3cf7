use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePart {
    pub color: String,
    pub name: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

/// Public view: colors and proportions only.
#[derive(Debug, Serialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

#[derive(Debug, Serialize)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Serialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|part| ShortRecipePart { color: part.color.clone(), parts: part.parts })
                .collect(),
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink { id: self.id, title: self.title.clone(), recipe: self.recipe.clone() }
    }
}

/// Clients send either a single part or a list of parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    One(RecipePart),
    Many(Vec<RecipePart>),
}

impl From<RecipeInput> for Vec<RecipePart> {
    fn from(value: RecipeInput) -> Self {
        match value {
            RecipeInput::One(part) => vec![part],
            RecipeInput::Many(parts) => parts,
        }
    }
}
