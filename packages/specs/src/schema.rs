// ABOUTME: Typed specification schemas, one per component category
// ABOUTME: Used only to gate writes; storage keeps the flattened key/value form

use serde::{Deserialize, Serialize};

use crate::category::ComponentCategory;

/// Decoded specification for one of the six categories
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", content = "specs", rename_all = "UPPERCASE")]
pub enum CategorySpecs {
    Cpu(CpuSpecs),
    Gpu(GpuSpecs),
    Mainboard(MainboardSpecs),
    Ram(RamSpecs),
    Storage(StorageSpecs),
    Psu(PsuSpecs),
}

impl CategorySpecs {
    pub fn category(&self) -> ComponentCategory {
        match self {
            CategorySpecs::Cpu(_) => ComponentCategory::Cpu,
            CategorySpecs::Gpu(_) => ComponentCategory::Gpu,
            CategorySpecs::Mainboard(_) => ComponentCategory::Mainboard,
            CategorySpecs::Ram(_) => ComponentCategory::Ram,
            CategorySpecs::Storage(_) => ComponentCategory::Storage,
            CategorySpecs::Psu(_) => ComponentCategory::Psu,
        }
    }
}

/// Shared trailing group of most schemas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseInfo {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub market: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub release_date: String,
}

// CPU

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSpecs {
    #[serde(deserialize_with = "crate::lenient::group")]
    pub architecture: CpuArchitecture,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub physical: CpuPhysical,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub cache: CpuCache,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub performance: CpuPerformance,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub other: ReleaseInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuArchitecture {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub code_name: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub generation: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub memory_support: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuPhysical {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub socket: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub foundry: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub process_size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuCache {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub l1: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub l2: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub l3: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuPerformance {
    pub cores: Option<i64>,
    pub threads: Option<i64>,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub integrated_graphics: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub frequency: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub turbo_clock: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub base_clock: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub tdp: String,
}

// GPU

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuSpecs {
    #[serde(deserialize_with = "crate::lenient::group")]
    pub architecture: GpuArchitecture,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub physical: GpuPhysical,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub memory: GpuMemory,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub performance: GpuPerformance,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub display: GpuDisplay,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub other: ReleaseInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuArchitecture {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub code_name: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub generation: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub process_size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuPhysical {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub length: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub width: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub height: String,
    pub slots: Option<i64>,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub weight: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub power_pins: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuMemory {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub size: String,
    #[serde(rename = "type", deserialize_with = "crate::lenient::string")]
    pub memory_type: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub bus: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub bandwidth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuPerformance {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub base_clock: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub boost_clock: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub memory_clock: String,
    pub cuda_cores: Option<i64>,
    pub stream_procs: Option<i64>,
    pub rt_cores: Option<i64>,
    pub tensor_cores: Option<i64>,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub tdp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuDisplay {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub max_resolution: String,
    pub max_displays: Option<i64>,
    #[serde(deserialize_with = "crate::lenient::strings")]
    pub outputs: Vec<String>,
}

// Mainboard

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardSpecs {
    #[serde(deserialize_with = "crate::lenient::group")]
    pub physical: MainboardPhysical,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub chipset: MainboardChipset,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub cpu: MainboardCpu,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub memory: MainboardMemory,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub expansion: MainboardExpansion,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub storage: MainboardStorage,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub connectivity: MainboardConnectivity,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub other: LightingInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardPhysical {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub form_factor: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub length: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub width: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardChipset {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub manufacturer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardCpu {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub socket: String,
    #[serde(deserialize_with = "crate::lenient::strings")]
    pub supported_cpus: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardMemory {
    #[serde(rename = "type", deserialize_with = "crate::lenient::string")]
    pub memory_type: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub max_capacity: String,
    pub slots: Option<i64>,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub max_speed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardExpansion {
    #[serde(deserialize_with = "crate::lenient::records")]
    pub pcie_slots: Vec<PcieSlot>,
    #[serde(deserialize_with = "crate::lenient::strings")]
    pub other_slots: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcieSlot {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub version: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub lanes: String,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardStorage {
    pub sata_ports: Option<i64>,
    #[serde(deserialize_with = "crate::lenient::records")]
    pub m2_slots: Vec<M2Slot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct M2Slot {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub key_type: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub length: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub interface: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub generation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardConnectivity {
    #[serde(deserialize_with = "crate::lenient::strings")]
    pub ethernet: Vec<String>,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub wifi: String,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub usb: UsbPorts,
    #[serde(deserialize_with = "crate::lenient::strings")]
    pub audio: Vec<String>,
    #[serde(deserialize_with = "crate::lenient::strings")]
    pub display: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbPorts {
    pub usb2: Option<i64>,
    pub usb3: Option<i64>,
    pub usbc: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingInfo {
    #[serde(deserialize_with = "crate::lenient::flag")]
    pub rgb_lighting: bool,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub release_date: String,
}

// RAM

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamSpecs {
    #[serde(deserialize_with = "crate::lenient::group")]
    pub physical: RamPhysical,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub memory: RamMemory,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub performance: RamPerformance,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub other: RamOther,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamPhysical {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub form_factor: String,
    pub modules: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamMemory {
    #[serde(rename = "type", deserialize_with = "crate::lenient::string")]
    pub memory_type: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub capacity: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub per_module: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamPerformance {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub speed: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub latency: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub voltage: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub timing: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamOther {
    #[serde(deserialize_with = "crate::lenient::flag")]
    pub rgb_lighting: bool,
    #[serde(deserialize_with = "crate::lenient::flag")]
    pub heat_sink: bool,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub release_date: String,
}

// Storage

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSpecs {
    #[serde(deserialize_with = "crate::lenient::group")]
    pub physical: StoragePhysical,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub performance: StoragePerformance,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub features: StorageFeatures,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub other: WarrantyInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePhysical {
    #[serde(rename = "type", deserialize_with = "crate::lenient::string")]
    pub drive_type: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub form_factor: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub interface: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub capacity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePerformance {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub read_speed: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub write_speed: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub iops: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub latency: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub endurance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageFeatures {
    #[serde(deserialize_with = "crate::lenient::flag")]
    pub encryption: bool,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub cache: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub controller: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarrantyInfo {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub warranty: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub release_date: String,
}

// PSU

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsuSpecs {
    #[serde(deserialize_with = "crate::lenient::group")]
    pub physical: PsuPhysical,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub power: PsuPower,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub connectors: PsuConnectors,
    #[serde(deserialize_with = "crate::lenient::group")]
    pub other: PsuOther,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsuPhysical {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub form_factor: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub length: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub width: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub height: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub weight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsuPower {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub wattage: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub efficiency: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub certification: String,
    #[serde(deserialize_with = "crate::lenient::flag")]
    pub modular: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsuConnectors {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub motherboard: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub cpu: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub pcie: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub sata: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub molex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsuOther {
    #[serde(deserialize_with = "crate::lenient::string")]
    pub fan_size: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub warranty: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub release_date: String,
}
