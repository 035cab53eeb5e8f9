// Built-in signal catalog for the solar race car
use super::catalog::{Catalog, CatalogError};
use super::signal::{Category, SignalDefinition};

const ACCENT: &str = "#C9302C";

fn num(name: &str, unit: &str, min: f64, max: f64, description: &str) -> SignalDefinition {
    SignalDefinition::continuous(name, unit, min, max, description)
}

fn flag(name: &str, min: f64, max: f64, description: &str) -> SignalDefinition {
    SignalDefinition::boolean(name, min, max, description)
}

pub fn solar_car_catalog() -> Result<Catalog, CatalogError> {
    Catalog::new(vec![
        Category::new(
            "Motor & Drive",
            "car-sport",
            ACCENT,
            vec![
                num("accelerator_pedal", "%", 0.0, 1.0, "Accelerator Position"),
                num("speed", "mph", 0.0, 100.0, "Vehicle Speed"),
                num("motor_current", "A", 0.0, 100.0, "Motor Current"),
                num("motor_power", "W", 0.0, 100.0, "Motor Power"),
                num("motor_temp", "°C", 0.0, 100.0, "Motor Temperature"),
                num("motor_controller_temp", "°C", 0.0, 100.0, "Motor Controller Temp"),
                num("regen_brake", "%", 0.0, 1.0, "Regenerative Braking"),
                flag("foot_brake", 0.0, 1.0, "Foot Brake"),
                flag("park_brake", 0.0, 1.0, "Park Brake"),
            ],
        ),
        Category::new(
            "Battery System",
            "battery-charging",
            ACCENT,
            vec![
                num("soc", "%", 0.0, 100.0, "State of Charge"),
                num("soh", "%", 0.0, 100.0, "State of Health"),
                num("pack_voltage", "V", 77.5, 113.15, "Pack Voltage"),
                num("pack_current", "A", -24.4, 48.8, "Pack Current"),
                num("pack_power", "W", -2760.86, 5521.72, "Pack Power"),
                num("pack_temp", "°C", 0.0, 55.0, "Pack Temperature"),
                num("pack_internal_temp", "°C", 0.0, 100.0, "Pack Internal Temp"),
                num("pack_amphours", "Ah", 57.0, 57.0, "Pack Amp Hours"),
                num("adaptive_total_capacity", "Ah", 0.0, 100.0, "Total Capacity"),
                num("fan_speed", "", 0.0, 6.0, "Cooling Fan Speed"),
                num("pack_resistance", "mΩ", 0.0, 100.0, "Pack Resistance"),
                flag("cell_balancing_active", 1.0, 1.0, "Cell Balancing"),
            ],
        ),
        Category::new(
            "Solar Array",
            "sunny",
            ACCENT,
            vec![
                num("mppt_current_out", "A", 0.0, 7.0, "MPPT Output Current"),
                num("mppt_power_out", "W", 0.0, 420.0, "MPPT Power Output"),
                num("string1_V_in", "V", 0.0, 60.0, "String 1 Voltage"),
                num("string2_V_in", "V", 0.0, 60.0, "String 2 Voltage"),
                num("string3_V_in", "V", 0.0, 60.0, "String 3 Voltage"),
                num("string1_I_in", "A", 0.0, 7.0, "String 1 Current"),
                num("string2_I_in", "A", 0.0, 7.0, "String 2 Current"),
                num("string3_I_in", "A", 0.0, 7.0, "String 3 Current"),
                num("string1_temp", "°C", 20.0, 50.0, "String 1 Temperature"),
                num("string2_temp", "°C", 20.0, 50.0, "String 2 Temperature"),
                num("string3_temp", "°C", 20.0, 50.0, "String 3 Temperature"),
                flag("mppt_mode", 0.0, 1.0, "MPPT Mode"),
            ],
        ),
        Category::new(
            "High Voltage",
            "flash",
            ACCENT,
            vec![
                flag("discharge_enabled", 0.0, 0.0, "Discharge Enabled"),
                flag("charge_enabled", 0.0, 0.0, "Charge Enabled"),
                flag("isolation", 0.0, 0.0, "HV Isolation"),
                flag("mppt_contactor", 1.0, 1.0, "MPPT Contactor"),
                flag("motor_controller_contactor", 1.0, 1.0, "MC Contactor"),
                flag("low_contactor", 1.0, 1.0, "Low Contactor"),
                num("dcdc_current", "A", 0.0, 100.0, "DC-DC Current"),
                num("dcdc_temp", "°C", 0.0, 100.0, "DC-DC Temperature"),
                flag("dcdc_deg", 1.0, 1.0, "DC-DC Derating"),
                flag("use_dcdc", 0.0, 0.0, "Use DC-DC"),
            ],
        ),
        Category::new(
            "Safety Systems",
            "shield-checkmark",
            ACCENT,
            vec![
                flag("driver_eStop", 0.0, 0.0, "Driver E-Stop"),
                flag("external_eStop", 0.0, 0.0, "External E-Stop"),
                flag("crash", 0.0, 0.0, "Crash Detection"),
                flag("bps_fault", 0.0, 0.0, "BPS Fault"),
                flag("voltage_failsafe", 0.0, 0.0, "Voltage Failsafe"),
                flag("current_failsafe", 0.0, 0.0, "Current Failsafe"),
                flag("relay_failsafe", 0.0, 0.0, "Relay Failsafe"),
                flag("charge_interlock_failsafe", 0.0, 0.0, "Charge Interlock"),
                flag("internal_hardware_fault", 0.0, 0.0, "Hardware Fault"),
                flag("internal_software_fault", 0.0, 0.0, "Software Fault"),
            ],
        ),
        Category::new(
            "Environmental",
            "thermometer",
            ACCENT,
            vec![
                num("air_temp", "°C", 0.0, 100.0, "Air Temperature"),
                num("brake_temp", "°C", 0.0, 100.0, "Brake Temperature"),
                num("road_temp", "°C", 0.0, 100.0, "Road Temperature"),
                num("mainIO_temp", "°C", 0.0, 100.0, "Main IO Temperature"),
            ],
        ),
        Category::new(
            "Power Systems",
            "power",
            ACCENT,
            vec![
                num("main_5V_bus", "V", 0.0, 100.0, "5V Bus Voltage"),
                num("main_12V_bus", "V", 0.0, 100.0, "12V Bus Voltage"),
                num("main_24V_bus", "V", 0.0, 100.0, "24V Bus Voltage"),
                num("main_5V_current", "A", 0.0, 100.0, "5V Bus Current"),
                num("main_12V_current", "A", 0.0, 100.0, "12V Bus Current"),
                num("main_24V_current", "A", 0.0, 100.0, "24V Bus Current"),
                num("supplemental_voltage", "V", 0.0, 100.0, "Supplemental Voltage"),
                num("supplemental_current", "A", 0.0, 100.0, "Supplemental Current"),
                num("est_supplemental_soc", "%", 0.0, 100.0, "Supplemental SOC"),
                num("bms_input_voltage", "V", 12.0, 24.0, "BMS Input Voltage"),
            ],
        ),
        Category::new(
            "Vehicle Controls",
            "settings",
            ACCENT,
            vec![
                num("mcc_state", "", 0.0, 7.0, "MCC State"),
                flag("crz_pwr_mode", 0.0, 1.0, "Cruise Power Mode"),
                flag("crz_spd_mode", 0.0, 1.0, "Cruise Speed Mode"),
                num("crz_pwr_setpt", "W", 0.0, 100.0, "Cruise Power Setpoint"),
                num("crz_spd_setpt", "mph", 0.0, 100.0, "Cruise Speed Setpoint"),
                flag("eco", 0.0, 1.0, "Eco Mode"),
                flag("l_turn_led_en", 0.0, 1.0, "Left Turn Signal"),
                flag("r_turn_led_en", 0.0, 1.0, "Right Turn Signal"),
                flag("brake_led_en", 0.0, 1.0, "Brake Light"),
                flag("headlights_led_en", 0.0, 1.0, "Headlights"),
                flag("hazards", 0.0, 0.0, "Hazard Lights"),
            ],
        ),
        Category::new(
            "Navigation",
            "navigate",
            ACCENT,
            vec![
                num("lat", "°", 43.0700, 43.0760, "Latitude"),
                num("lon", "°", -89.4050, -89.3950, "Longitude"),
                num("elev", "m", 260.0, 280.0, "Elevation"),
            ],
        ),
        Category::new(
            "System Status",
            "pulse",
            ACCENT,
            vec![
                flag("bms_can_heartbeat", 1.0, 1.0, "BMS CAN Heartbeat"),
                flag("hv_can_heartbeat", 1.0, 1.0, "HV CAN Heartbeat"),
                flag("mainIO_heartbeat", 1.0, 1.0, "Main IO Heartbeat"),
                flag("mcc_can_heartbeat", 1.0, 1.0, "MCC CAN Heartbeat"),
                flag("mppt_can_heartbeat", 1.0, 1.0, "MPPT CAN Heartbeat"),
                flag("fr_telem", 0.0, 1.0, "Front Telemetry"),
                flag("main_telem", 0.0, 1.0, "Main Telemetry"),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = solar_car_catalog().unwrap();
        assert_eq!(catalog.categories().len(), 10);
        assert_eq!(catalog.signal_count(), 88);
        assert_eq!(
            catalog.category_names().collect::<Vec<_>>(),
            vec![
                "Motor & Drive",
                "Battery System",
                "Solar Array",
                "High Voltage",
                "Safety Systems",
                "Environmental",
                "Power Systems",
                "Vehicle Controls",
                "Navigation",
                "System Status",
            ]
        );
    }

    #[test]
    fn test_builtin_catalog_icons() {
        let catalog = solar_car_catalog().unwrap();
        let battery = catalog.category("Battery System").unwrap();
        assert_eq!(battery.icon, "battery-charging");
        assert_eq!(battery.color, "#C9302C");
        assert_eq!(catalog.category("System Status").unwrap().icon, "pulse");
    }

    #[test]
    fn test_bool_signals_carry_no_unit() {
        let catalog = solar_car_catalog().unwrap();
        assert!(
            catalog
                .iter_signals()
                .filter(|(_, s)| s.is_bool())
                .all(|(_, s)| s.unit.is_empty())
        );
    }
}
