//! Turns expanded declarations into attachments hung off game entities.

use tracing::debug;

use crate::attachments::legacy::{normalize_option_name, normalize_option_value};
use crate::attachments::{AttachmentVariant, TargetKind};
use crate::data::AttachmentDecl;
use crate::error::{Result, ScenarioError};
use crate::expansion::{expand, ExpandedDeclaration, VariableTable};
use crate::game::{AppliedAttachment, AttachmentId, GameData};

/// Builds attachments for one scenario.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentBuilder<'a> {
    map: &'a str,
    variables: &'a VariableTable,
}

impl<'a> AttachmentBuilder<'a> {
    /// Builder for the scenario `map` using its variable table.
    #[must_use]
    pub const fn new(map: &'a str, variables: &'a VariableTable) -> Self {
        Self { map, variables }
    }

    /// Expand and build every declaration, in order.
    ///
    /// # Errors
    ///
    /// The first expansion or build failure; the scenario must be rejected.
    pub fn build_all(&self, data: &mut GameData, decls: &[AttachmentDecl]) -> Result<Vec<AttachmentId>> {
        let mut built = Vec::new();
        for decl in decls {
            for expanded in expand(decl, self.variables)? {
                built.push(self.build(data, &expanded)?);
            }
        }
        Ok(built)
    }

    /// Build one expanded declaration and attach it to its target.
    ///
    /// # Errors
    ///
    /// - [`ScenarioError::Format`] for an unknown target kind or an empty
    ///   option name
    /// - [`ScenarioError::MissingEntity`] if the target does not exist
    /// - [`ScenarioError::UnknownAttachmentVariant`] for an unsupported class
    ///   or a class that cannot hang off the target kind
    /// - [`ScenarioError::UnknownProperty`] for an option outside the schema
    /// - [`ScenarioError::InAttachment`] wrapping any setter failure
    pub fn build(&self, data: &mut GameData, decl: &ExpandedDeclaration) -> Result<AttachmentId> {
        let kind: TargetKind = decl.target_kind.parse()?;
        let target = data.resolve_target(kind, &decl.attach_to)?;
        let variant = AttachmentVariant::from_class_name(&decl.class)?;
        if !variant.accepts(kind) {
            return Err(ScenarioError::UnknownAttachmentVariant(format!(
                "{} cannot be attached to a {kind}",
                decl.class
            )));
        }

        let mut attachment = variant.instantiate();
        let mut values = Vec::with_capacity(decl.options.len());
        for option in &decl.options {
            let Some(name) = normalize_option_name(&option.name, &decl.name)? else {
                continue;
            };
            let joined = match option.count.as_deref().filter(|c| !c.is_empty()) {
                Some(count) => format!("{count}:{}", option.value),
                None => option.value.clone(),
            };
            let value = normalize_option_value(&name, self.variables.substitute(&joined));
            attachment
                .set_property(&name, &value, data, &decl.name)
                .map_err(|err| self.in_attachment(decl, err))?;
            values.push((name, value));
        }

        debug!(
            attachment = %decl.name,
            target = %decl.attach_to,
            variant = %variant,
            options = values.len(),
            "built attachment"
        );
        let id = data.attach(decl.name.clone(), target, attachment)?;
        data.record_applied(AppliedAttachment {
            attachment: id,
            name: decl.name.clone(),
            target,
            values,
        });
        Ok(id)
    }

    fn in_attachment(&self, decl: &ExpandedDeclaration, err: ScenarioError) -> ScenarioError {
        match err {
            ScenarioError::UnknownProperty { .. } => err,
            other => ScenarioError::InAttachment {
                map: self.map.to_string(),
                declaration: decl.declaration.clone(),
                attachment: decl.name.clone(),
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{OptionDecl, VariableDecl};
    use crate::game::AttachmentTarget;

    fn sample_data() -> GameData {
        let mut data = GameData::new("test");
        data.add_player("Germans").unwrap();
        data.add_player("Russians").unwrap();
        data.add_territory("Germany", false).unwrap();
        data.add_territory("Russia", false).unwrap();
        data.add_unit_type("infantry").unwrap();
        data.add_unit_type("armour").unwrap();
        data
    }

    #[test]
    fn test_builds_and_records_values() {
        let mut data = sample_data();
        let vars = VariableTable::from_decls(&[VariableDecl {
            name: "land".into(),
            elements: vec!["infantry".into(), "armour".into()],
        }])
        .unwrap();
        let decl = AttachmentDecl::new(
            "conditionAttachmentGermany",
            "Germans",
            "player",
            "games.strategy.triplea.attachments.RulesAttachment",
        )
        .with_option(OptionDecl::new("DirectOwnershipTerritories", "Germany"))
        .with_option(OptionDecl::new("unitPresence", "$land$").with_count("3"))
        .with_option(OptionDecl::new("takeUnitControl", "true"));

        let builder = AttachmentBuilder::new("test", &vars);
        let ids = builder.build_all(&mut data, &[decl]).unwrap();
        assert_eq!(ids.len(), 1);

        let germans = data.player_id("Germans").unwrap();
        assert_eq!(
            data.attachment_named(AttachmentTarget::Player(germans), "conditionAttachmentGermany"),
            Some(ids[0])
        );
        let applied = &data.applied_attachments()[0];
        assert_eq!(
            applied.values,
            vec![
                ("directOwnershipTerritories".to_string(), "Germany".to_string()),
                ("unitPresence".to_string(), "3:infantry:armour".to_string()),
            ]
        );
        let rules = data.rules(ids[0]).unwrap();
        assert_eq!(rules.unit_presence[0].count, 3);
    }

    #[test]
    fn test_foreach_builds_one_per_element() {
        let mut data = sample_data();
        let vars = VariableTable::from_decls(&[VariableDecl {
            name: "units".into(),
            elements: vec!["infantry".into(), "armour".into()],
        }])
        .unwrap();
        let decl = AttachmentDecl::new("unitAttachment", "@units@", "unitType", "UnitAttachment")
            .with_foreach("$units$")
            .with_option(OptionDecl::new("movement", "1"));
        let ids = AttachmentBuilder::new("test", &vars)
            .build_all(&mut data, &[decl])
            .unwrap();
        assert_eq!(ids.len(), 2);
        let armour = data.require_unit_type("armour").unwrap();
        assert_eq!(data.unit_attachment(armour).unwrap().movement, 1);
    }

    #[test]
    fn test_missing_target_and_unknown_kind() {
        let mut data = sample_data();
        let vars = VariableTable::new();
        let builder = AttachmentBuilder::new("test", &vars);

        let decl = AttachmentDecl::new("a", "Italians", "player", "RulesAttachment");
        let err = builder.build_all(&mut data, &[decl]).unwrap_err();
        assert!(matches!(err, ScenarioError::MissingEntity { .. }));

        let decl = AttachmentDecl::new("a", "Germans", "nation", "RulesAttachment");
        let err = builder.build_all(&mut data, &[decl]).unwrap_err();
        assert!(err.to_string().contains("Type not found to attach to"));
    }

    #[test]
    fn test_unknown_property_names_option_and_attachment() {
        let mut data = sample_data();
        let vars = VariableTable::new();
        let decl = AttachmentDecl::new("unitAttachment", "infantry", "unitType", "UnitAttachment")
            .with_option(OptionDecl::new("teleport", "true"));
        let err = AttachmentBuilder::new("test", &vars)
            .build_all(&mut data, &[decl])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing property definition for option 'teleport' in attachment 'unitAttachment'"
        );
    }

    #[test]
    fn test_setter_failure_is_wrapped_with_context() {
        let mut data = sample_data();
        let vars = VariableTable::new();
        let decl = AttachmentDecl::new("ua_@x@", "infantry", "unitType", "UnitAttachment")
            .with_option(OptionDecl::new("attack", "strong"));
        let err = AttachmentBuilder::new("big_world", &vars)
            .build_all(&mut data, &[decl])
            .unwrap_err();
        match err {
            ScenarioError::InAttachment { map, attachment, .. } => {
                assert_eq!(map, "big_world");
                assert_eq!(attachment, "ua_@x@");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_variant_must_match_target_kind() {
        let mut data = sample_data();
        let vars = VariableTable::new();
        let decl = AttachmentDecl::new("rules", "infantry", "unitType", "RulesAttachment");
        let err = AttachmentBuilder::new("test", &vars)
            .build_all(&mut data, &[decl])
            .unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownAttachmentVariant(_)));
    }
}
