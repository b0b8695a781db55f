use shapediff_diff::{Diff, DiffConfig, DiffEngine, DiffResult};
use shapediff_model::Model;
use shapediff_optimizer::ScoreOptimizer;
use shapediff_types::Value;
use tracing::debug;

/// A configured diff entry point.
///
/// Owns the optimizer selected by its [`DiffConfig`], so one `Differ` can be
/// reused (and shared across threads) for any number of diffs.
pub struct Differ {
    config: DiffConfig,
    optimizer: Box<dyn ScoreOptimizer>,
}

impl Differ {
    /// Build a differ from a validated configuration.
    pub fn new(config: DiffConfig) -> DiffResult<Self> {
        config.validate()?;
        let optimizer = config.build_optimizer();
        debug!(
            threshold = config.threshold,
            optimizer = optimizer.name(),
            "differ configured"
        );
        Ok(Self { config, optimizer })
    }

    /// Build a differ from a TOML configuration document.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        Self::new(DiffConfig::from_toml_str(s)?)
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn optimizer(&self) -> &dyn ScoreOptimizer {
        self.optimizer.as_ref()
    }

    /// The engine backing this differ.
    pub fn engine(&self) -> DiffResult<DiffEngine<'_>> {
        DiffEngine::new(self.config.threshold, self.optimizer.as_ref())
    }

    /// Diff `left` against `right` under `model`.
    pub fn diff(&self, model: &Model, left: &Value, right: &Value) -> DiffResult<Diff> {
        self.engine()?.diff(model, left, right)
    }
}

impl Default for Differ {
    fn default() -> Self {
        let config = DiffConfig::default();
        let optimizer = config.build_optimizer();
        Self { config, optimizer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapediff_diff::DiffError;
    use shapediff_model::Property;
    use shapediff_optimizer::{OptimizerError, OptimizerKind};
    use shapediff_types::{Path, Status};
    use std::time::Duration;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn string() -> Model {
        Model::value("String")
    }

    fn person_model() -> Model {
        let address = Model::bean(
            "Address",
            [
                Property::new("street", string()),
                Property::new("city", string()),
            ],
        )
        .unwrap();
        Model::bean(
            "Person",
            [
                Property::new("firstName", string()),
                Property::new("lastName", string()),
                Property::new("currentAddress", address),
                Property::new("nicknames", Model::list(string())),
                Property::new("emails", Model::set(string())),
                Property::new("phones", Model::map(string(), string())),
            ],
        )
        .unwrap()
    }

    fn json(s: &str) -> Value {
        Value::from(serde_json::from_str::<serde_json::Value>(s).unwrap())
    }

    #[test]
    fn scenario_a_bean_with_one_changed_property() {
        init_tracing();
        let differ = Differ::default();
        let d = differ
            .diff(
                &person_model(),
                &json(r#"{"firstName": "John", "lastName": "Doe"}"#),
                &json(r#"{"firstName": "Jack", "lastName": "Doe"}"#),
            )
            .unwrap();

        assert_eq!(d.status(), Status::Modified);
        let flat = d.to_map("person");
        assert_eq!(flat["person.firstName"].status(), Status::Modified);
        assert_eq!(flat["person.firstName"].score(), 0.0);
        assert_eq!(flat["person.lastName"].status(), Status::Unchanged);
        assert_eq!(flat["person.lastName"].score(), 1.0);
    }

    #[test]
    fn scenario_b_set_of_names() {
        init_tracing();
        let differ = Differ::default();
        // Children follow the model comparator's order, not input order.
        let d = differ
            .diff(
                &Model::set(string()),
                &Value::set(["Patrick", "Fitzgerald"]),
                &Value::set(["Patrick", "Michael"]),
            )
            .unwrap();

        let got: Vec<(Status, Value, Value)> = d
            .children()
            .into_iter()
            .map(|(_, c)| (c.status(), c.left().clone(), c.right().clone()))
            .collect();
        assert_eq!(
            got,
            [
                (Status::Removed, Value::from("Fitzgerald"), Value::Null),
                (Status::Added, Value::Null, Value::from("Michael")),
                (Status::Unchanged, Value::from("Patrick"), Value::from("Patrick")),
            ]
        );
    }

    #[test]
    fn scenario_c_identity_assignment() {
        let differ = Differ::default();
        let matrix = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        assert_eq!(differ.optimizer().solve(3, 3, &matrix).unwrap(), [0, 1, 2]);
    }

    #[test]
    fn scenario_d_absent_address() {
        init_tracing();
        let differ = Differ::default();
        let left = json(
            r#"{"firstName": "John", "lastName": "Doe",
                "currentAddress": {"street": "1 Main St", "city": "Springfield"}}"#,
        );
        let right = json(r#"{"firstName": "John", "lastName": "Doe"}"#);
        let d = differ.diff(&person_model(), &left, &right).unwrap();

        let address = d.extract(&Path::root().property("currentAddress")).unwrap();
        assert_eq!(address.status(), Status::Removed);
        for (_, child) in address.children() {
            assert_eq!(child.status(), Status::Removed);
        }
        assert_eq!(d.status(), Status::Modified);
    }

    #[test]
    fn nested_collections_end_to_end() {
        init_tracing();
        let differ = Differ::default();
        let model = person_model();
        let phones = Path::root().property("phones");

        // JSON arrays arrive as lists, which the set extractor also accepts.
        // JSON objects become beans, so the map is written in explicitly.
        let mut left = json(
            r#"{"firstName": "Ann", "nicknames": ["A", "Annie"],
                "emails": ["ann@a.org", "ann@b.org"]}"#,
        );
        model
            .set_at(&mut left, &phones, Value::map([("home", "1"), ("work", "2")]))
            .unwrap();
        let mut right = json(
            r#"{"firstName": "Ann", "nicknames": ["Annie"], "emails": ["ann@b.org"]}"#,
        );
        model
            .set_at(&mut right, &phones, Value::map([("home", "1"), ("work", "3")]))
            .unwrap();

        let d = differ.diff(&model, &left, &right).unwrap();

        let flat = d.to_map("");
        assert_eq!(flat[".nicknames[0]"].status(), Status::Removed);
        assert!(flat[".nicknames[1]"].is_unchanged());
        assert_eq!(flat[".emails[0]"].status(), Status::Removed);
        assert!(flat[".emails[1]"].is_unchanged());
        assert!(flat[".phones{home}"].is_unchanged());
        assert_eq!(flat[".phones{work}"].status(), Status::Modified);

        let summary = d.summary();
        assert_eq!(summary.total(), flat.len());
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.modified, 5);
        assert_eq!(summary.unchanged, 8);
    }

    #[test]
    fn configured_from_toml() {
        let differ = Differ::from_toml_str(
            r#"
            threshold = 1.0
            optimizer = "approximate"
            "#,
        )
        .unwrap();
        assert_eq!(differ.optimizer().name(), "greedy");
        assert_eq!(differ.config().optimizer, OptimizerKind::Approximate);

        let d = differ
            .diff(
                &Model::list(person_model()),
                &Value::list([json(r#"{"firstName": "John", "lastName": "Doe"}"#)]),
                &Value::list([json(r#"{"firstName": "Jack", "lastName": "Doe"}"#)]),
            )
            .unwrap();
        let statuses: Vec<Status> = d.children().iter().map(|(_, c)| c.status()).collect();
        assert_eq!(statuses, [Status::Removed, Status::Added]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DiffConfig {
            threshold: 0.0,
            ..Default::default()
        };
        assert!(matches!(Differ::new(config), Err(DiffError::InvalidThreshold(_))));
    }

    #[test]
    fn timeout_then_approximate_retry() {
        init_tracing();
        let model = Model::set(person_model());
        let left = Value::set([json(r#"{"firstName": "John", "lastName": "Doe"}"#)]);
        let right = Value::set([json(r#"{"firstName": "Jack", "lastName": "Doe"}"#)]);

        let strict_budget = Differ::new(DiffConfig {
            exact_timeout: Duration::ZERO,
            step_interval: 1,
            ..Default::default()
        })
        .unwrap();
        let err = strict_budget.diff(&model, &left, &right).unwrap_err();
        assert!(matches!(
            err,
            DiffError::Optimizer(OptimizerError::Timeout { .. })
        ));

        let d = Differ::new(DiffConfig::approximate())
            .unwrap()
            .diff(&model, &left, &right)
            .unwrap();
        assert_eq!(d.children().len(), 1);
        assert_eq!(d.children()[0].1.status(), Status::Modified);
    }

    #[test]
    fn differ_is_shareable_across_threads() {
        let differ = std::sync::Arc::new(Differ::default());
        let model = std::sync::Arc::new(Model::set(string()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let differ = differ.clone();
                let model = model.clone();
                std::thread::spawn(move || {
                    let left = Value::set(["a", "b"]);
                    let right = Value::set([format!("{i}"), "b".to_string()]);
                    differ.diff(&model, &left, &right).map(|d| d.status())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), Status::Modified);
        }
    }
}
