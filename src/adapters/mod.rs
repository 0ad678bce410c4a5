//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to                 |
//! |-----------------|--------------------|-----------------------------|
//! | `hardware`      | DistanceSource     | HC-SR04 pair                |
//! |                 | RelayPort          | Light relay GPIO            |
//! | `lcd_presenter` | EventSink          | 16×2 LCD (DisplayPort)      |
//! | `log_sink`      | EventSink          | Serial log output           |
//! | `nvs`           | ConfigPort         | NVS / in-memory store       |
//! |                 | StoragePort        |                             |
//! |                 | CounterStore       |                             |
//! | `time`          | ClockPort          | ESP32 high-resolution timer |
//! |                 | MicroTimer         |                             |

pub mod hardware;
pub mod lcd_presenter;
pub mod log_sink;
pub mod nvs;
pub mod time;
