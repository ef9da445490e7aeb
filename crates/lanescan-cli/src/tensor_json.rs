//! JSON form of a tensor: `{ "dtype": "f32", "shape": [2, 3], "data": [...] }`.

use anyhow::{anyhow, bail, Context};
use half::f16;
use lanescan_core::storage::StorageData;
use lanescan_core::{DType, Tensor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorJson {
    pub dtype: String,
    pub shape: Vec<usize>,
    pub data: Vec<Value>,
}

impl TensorJson {
    pub fn to_tensor(&self) -> anyhow::Result<Tensor> {
        let dtype = DType::from_name(&self.dtype)
            .ok_or_else(|| anyhow!("unknown dtype '{}'", self.dtype))?;
        let tensor = match dtype {
            DType::F16 => Tensor::new(
                floats(&self.data)?.into_iter().map(f16::from_f64).collect(),
                &self.shape,
            )?,
            DType::F32 => Tensor::new(
                floats(&self.data)?.into_iter().map(|v| v as f32).collect(),
                &self.shape,
            )?,
            DType::F64 => Tensor::new(floats(&self.data)?, &self.shape)?,
            DType::I32 => {
                let values = ints(&self.data)?
                    .into_iter()
                    .map(i32::try_from)
                    .collect::<Result<Vec<_>, _>>()
                    .context("value does not fit in i32")?;
                Tensor::new(values, &self.shape)?
            }
            DType::I64 => Tensor::new(ints(&self.data)?, &self.shape)?,
            other => bail!("dtype {other} cannot be loaded from JSON"),
        };
        Ok(tensor)
    }

    pub fn from_tensor(tensor: &Tensor) -> anyhow::Result<Self> {
        let data: Vec<Value> = match tensor.storage().data() {
            StorageData::F16(v) => v.iter().map(|x| Value::from(x.to_f64())).collect(),
            StorageData::F32(v) => v.iter().map(|&x| Value::from(f64::from(x))).collect(),
            StorageData::F64(v) => v.iter().map(|&x| Value::from(x)).collect(),
            StorageData::I32(v) => v.iter().map(|&x| Value::from(x)).collect(),
            StorageData::I64(v) => v.iter().map(|&x| Value::from(x)).collect(),
            StorageData::Raw(_) => bail!("dtype {} cannot be written as JSON", tensor.dtype()),
        };
        Ok(Self {
            dtype: tensor.dtype().to_string(),
            shape: tensor.shape().dims().to_vec(),
            data,
        })
    }
}

fn floats(values: &[Value]) -> anyhow::Result<Vec<f64>> {
    values
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| anyhow!("expected a number, got {v}")))
        .collect()
}

fn ints(values: &[Value]) -> anyhow::Result<Vec<i64>> {
    values
        .iter()
        .map(|v| v.as_i64().ok_or_else(|| anyhow!("expected an integer, got {v}")))
        .collect()
}
