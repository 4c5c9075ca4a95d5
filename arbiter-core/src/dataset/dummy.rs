//! Synthetic datasets whose class is a function of the row index.

use super::{Attribute, Instances, Value};
use crate::error::DatasetError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Shape of a generated dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DummySpec {
    pub num_instances: usize,
    pub num_classes: usize,
    pub useful_numeric: usize,
    pub useful_categorical: usize,
    pub random_numeric: usize,
    pub random_categorical: usize,
    pub random_categorical_size: usize,
    pub seed: u64,
}

impl Default for DummySpec {
    fn default() -> Self {
        Self {
            num_instances: 100,
            num_classes: 2,
            useful_numeric: 2,
            useful_categorical: 1,
            random_numeric: 1,
            random_categorical: 1,
            random_categorical_size: 3,
            seed: 0,
        }
    }
}

/// Build a dataset where row `j` has class `j % num_classes`.
///
/// Useful attributes are deterministic functions of the class; random
/// attributes are drawn from a generator seeded with `spec.seed`.
pub fn create_dummy_instances(spec: &DummySpec) -> Result<Instances, DatasetError> {
    if spec.num_classes == 0 {
        return Err(DatasetError::InvalidSpec {
            message: "at least one class is required".into(),
        });
    }
    if spec.random_categorical > 0 && spec.random_categorical_size == 0 {
        return Err(DatasetError::InvalidSpec {
            message: "random categorical attributes need a non-empty domain".into(),
        });
    }

    let classes: Vec<String> = (0..spec.num_classes).map(|i| i.to_string()).collect();
    let random_domain: Vec<String> = (0..spec.random_categorical_size)
        .map(|i| format!("rcat{}", i))
        .collect();

    let mut attributes = Vec::new();
    attributes.extend((0..spec.useful_numeric).map(|i| Attribute::numeric(format!("usefulNumeric{}", i))));
    attributes.extend(
        (0..spec.useful_categorical)
            .map(|i| Attribute::nominal(format!("usefulCategorical{}", i), classes.clone())),
    );
    attributes.extend((0..spec.random_numeric).map(|i| Attribute::numeric(format!("randomNumeric{}", i))));
    attributes.extend(
        (0..spec.random_categorical)
            .map(|i| Attribute::nominal(format!("randomCategorical{}", i), random_domain.clone())),
    );
    attributes.push(Attribute::nominal("class", classes));

    let mut instances = Instances::new("dummy", attributes).with_last_as_class()?;
    let mut rng = StdRng::seed_from_u64(spec.seed);

    for j in 0..spec.num_instances {
        let class_value = j % spec.num_classes;
        let mut row = Vec::new();
        row.extend((0..spec.useful_numeric).map(|i| Value::Number((class_value * (i + 1)) as f64)));
        row.extend(
            (0..spec.useful_categorical)
                .map(|i| Value::Nominal((class_value * (i + 1)) % spec.num_classes)),
        );
        for _ in 0..spec.random_numeric {
            row.push(Value::Number(standard_normal(&mut rng)));
        }
        for _ in 0..spec.random_categorical {
            row.push(Value::Nominal(rng.gen_range(0..spec.random_categorical_size)));
        }
        row.push(Value::Nominal(class_value));
        instances.push(row)?;
    }

    Ok(instances)
}

/// Box-Muller transform.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AttributeType, Dataset};

    #[test]
    fn test_default_shape() {
        let data = create_dummy_instances(&DummySpec::default()).unwrap();
        assert_eq!(data.num_instances(), 100);
        assert_eq!(data.attributes().len(), 6);
        assert_eq!(data.class_index(), Some(5));
        assert_eq!(data.attributes()[0].name, "usefulNumeric0");
        assert_eq!(data.attributes()[4].name, "randomCategorical0");
    }

    #[test]
    fn test_class_follows_row_index() {
        let spec = DummySpec {
            num_instances: 7,
            num_classes: 3,
            ..DummySpec::default()
        };
        let data = create_dummy_instances(&spec).unwrap();
        let class = data.class_index().unwrap();
        let classes: Vec<_> = data.rows().iter().map(|r| r[class].clone()).collect();
        assert_eq!(classes[4], Value::Nominal(1));
        assert_eq!(classes[6], Value::Nominal(0));
        // usefulNumeric1 = class * 2
        assert_eq!(data.rows()[5][1], Value::Number(4.0));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let spec = DummySpec {
            seed: 42,
            ..DummySpec::default()
        };
        let a = create_dummy_instances(&spec).unwrap();
        let b = create_dummy_instances(&spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_domain() {
        let spec = DummySpec {
            random_categorical_size: 4,
            ..DummySpec::default()
        };
        let data = create_dummy_instances(&spec).unwrap();
        match &data.attributes()[4].kind {
            AttributeType::Nominal(values) => assert_eq!(values.len(), 4),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_zero_classes_rejected() {
        let spec = DummySpec {
            num_classes: 0,
            ..DummySpec::default()
        };
        assert!(create_dummy_instances(&spec).is_err());
    }
}
