use axum::Json;

use cupid_types::models::Template;

pub const TEMPLATES: [Template; 5] = [
    Template {
        template_id: "runaway_no",
        name: "The Runaway No",
        description: "The No button runs away from the cursor!",
        interaction_type: "runaway",
    },
    Template {
        template_id: "emotional_damage",
        name: "Emotional Damage",
        description: "Sad messages and dimming screen when hovering No",
        interaction_type: "emotional",
    },
    Template {
        template_id: "guilt_trip",
        name: "Guilt Trip Deluxe",
        description: "Each No click makes Yes bigger and messages more dramatic",
        interaction_type: "guilt",
    },
    Template {
        template_id: "puppy_eyes",
        name: "Puppy Eyes Mode",
        description: "Cute puppy appears with big watery eyes",
        interaction_type: "puppy",
    },
    Template {
        template_id: "destiny_mode",
        name: "Destiny Mode",
        description: "Loading screen shows you're meant to say YES",
        interaction_type: "destiny",
    },
];

pub fn is_known_template(template_id: &str) -> bool {
    TEMPLATES.iter().any(|t| t.template_id == template_id)
}

/// GET /templates
pub async fn list_templates() -> Json<&'static [Template]> {
    Json(&TEMPLATES[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_fixed() {
        let ids: Vec<_> = TEMPLATES.iter().map(|t| t.template_id).collect();
        assert_eq!(
            ids,
            ["runaway_no", "emotional_damage", "guilt_trip", "puppy_eyes", "destiny_mode"]
        );
    }

    #[test]
    fn known_template_lookup() {
        assert!(is_known_template("puppy_eyes"));
        assert!(!is_known_template("Puppy_Eyes"));
        assert!(!is_known_template(""));
    }
}
