// Bootstrap report output

use crate::coordinators::BootstrapReport;

/// Print what the startup bootstrap changed
pub fn print_report(report: &BootstrapReport, root_username: &str) {
    println!("\n=== Tabwarden Bootstrap ===\n");

    if !report.changed_anything() {
        println!("Store already bootstrapped, nothing to do.");
        return;
    }

    println!("Roles created:        {}", report.roles_created);
    println!("Tabs created:         {}", report.tabs_created);
    println!("Permissions granted:  {}", report.permissions_granted);

    if report.root_created {
        if report.stale_root_replaced {
            println!("Replaced a stale '{}' account that was not a super admin.", root_username);
        }
        println!("Super admin '{}' created.", root_username);
        match &report.generated_password {
            Some(password) => {
                println!("\nGenerated password: {}", password);
                println!("Store it now. It will not be shown again.");
            }
            None => println!("Password taken from ROOT_PASSWORD."),
        }
    }
}
