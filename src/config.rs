use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::slice::{MissingColumns, RowWindow};
use crate::error::{Error, Result};
use crate::render::style::StyleKind;

// ---------------------------------------------------------------------------
// Variable configuration: display key → (English name, unit)
// ---------------------------------------------------------------------------

/// One plotted variable: the CSV header it is read from, its English
/// display name and its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub key: String,
    pub name: String,
    pub unit: String,
}

impl VariableSpec {
    pub fn new(key: &str, name: &str, unit: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
        }
    }

    /// First word of the English name, or the whole name if it is one word.
    pub fn short_name(&self) -> &str {
        let mut words = self.name.split(' ');
        match (words.next(), words.next()) {
            (Some(first), Some(_)) => first,
            _ => &self.name,
        }
    }
}

/// Ordered set of plotted variables. Order decides panel position and the
/// `X1..Xn` numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableConfig {
    variables: Vec<VariableSpec>,
}

impl VariableConfig {
    pub fn new(variables: Vec<VariableSpec>) -> Self {
        Self { variables }
    }

    /// The twenty cement calcination process variables.
    pub fn cement_calcination() -> Self {
        let v = VariableSpec::new;
        Self::new(vec![
            v("尾排风机变频电流反馈", "Tail Fan Inverter Current Feedback", "A"),
            v("铝氧率平均值", "Average Aluminum-Oxygen Ratio", "%"),
            v("窑头排风机工频电流", "Kiln Head Fan Power Frequency Current", "A"),
            v("吨熟料标煤耗", "Standard Coal Consumption per Ton of Clinker", "kgce/t"),
            v("C4B出口温度", "C4B Outlet Temperature", "℃"),
            v("窑电流平均值", "Average Kiln Current", "A"),
            v("喂料量反馈", "Feeding Rate Feedback", "t/h"),
            v("窑尾温度平均值", "Average Kiln Outlet Temperature", "℃"),
            v("C2A出口压力", "C2A Outlet Pressure", "Pa"),
            v("高温风机入口气体温度", "High-Temp Fan Inlet Gas Temperature", "℃"),
            v("高温风机入口气体压力", "High-Temp Fan Inlet Gas Pressure", "Pa"),
            v("分解炉煤反馈", "Calciner Coal Feed Feedback", "kg/h"),
            v("二次风温平均值", "Average Secondary Air Temperature", "℃"),
            v("窑尾负压", "Kiln Outlet Negative Pressure", "Pa"),
            v("三次风温", "Tertiary Air Temperature", "℃"),
            v("窑喂料提升机电流", "Kiln Feeding Hoist Current", "A"),
            v("窑系统单位电耗", "Kiln System Unit Power Consumption", "kWh/t"),
            v("C4A出口温度", "C4A Outlet Temperature", "℃"),
            v("C2A出口温度", "C2A Outlet Temperature", "℃"),
            v("f_CaO", "f_CaO Content", "%"),
        ])
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableSpec> {
        self.variables.iter()
    }

    pub fn get(&self, key: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.key == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.key.clone()).collect()
    }

    /// Keep only the variables whose key is in `keys`, preserving order.
    pub fn retain_keys(&self, keys: &[String]) -> Self {
        Self::new(
            self.variables
                .iter()
                .filter(|v| keys.contains(&v.key))
                .cloned()
                .collect(),
        )
    }

    pub fn english_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    /// Compact legend labels: `X1: Tail [A]`.
    pub fn legend_labels(&self) -> Vec<String> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| format!("X{}: {} [{}]", i + 1, v.short_name(), v.unit))
            .collect()
    }

    /// Row labels for the statistics table keyed by the original headers.
    pub fn stats_labels_cn(&self) -> Vec<String> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{} (X{})", v.key, i + 1))
            .collect()
    }

    /// Row labels for the statistics table keyed by the English names.
    pub fn stats_labels_en(&self) -> Vec<String> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| format!("X{}: {} [{}]", i + 1, v.name, v.unit))
            .collect()
    }
}

impl Default for VariableConfig {
    fn default() -> Self {
        Self::cement_calcination()
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything a run needs. Defaults reproduce the test-set extraction of
/// raw rows 44200-44560; a JSON file may override any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: PathBuf,
    /// `encoding_rs` label of the input file.
    pub encoding: String,
    pub base_dir: PathBuf,
    pub folder_name: String,
    pub file_name: String,
    pub max_row_position: usize,
    pub window: RowWindow,
    pub missing_columns: MissingColumns,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub style: StyleKind,
    pub variables: VariableConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("CementCalcinationProcessData.csv"),
            encoding: "gbk".to_string(),
            base_dir: PathBuf::from("."),
            folder_name: "一次异常发生的时间序列测试集(44200-44560)".to_string(),
            file_name: "Cement_Process_Test_English_44200-44560.png".to_string(),
            max_row_position: 80_000,
            window: RowWindow::new(44_200 - 1, 44_560 - 1),
            missing_columns: MissingColumns::Fail,
            title: "Cement calcination process test set:process variables".to_string(),
            x_label: "Index in Interval (0-360)".to_string(),
            y_label: "Value".to_string(),
            style: StyleKind::English,
            variables: VariableConfig::default(),
        }
    }
}

impl RunConfig {
    /// Read a JSON override file. Fields left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: RunConfig = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.variables.is_empty() {
            return Err(Error::Config("no variables configured".to_string()));
        }
        if self.file_name.is_empty() {
            return Err(Error::Config("empty output file name".to_string()));
        }
        Ok(())
    }

    pub fn save_folder(&self) -> PathBuf {
        self.base_dir.join(&self.folder_name)
    }
}
