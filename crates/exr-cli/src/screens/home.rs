use crate::prompt::{self, Prompter};
use crate::screens::Route;

const DESTINATIONS: [Route; 5] = [
    Route::SignUp,
    Route::ConfirmSignUp { username: None },
    Route::SignIn,
    Route::TravelForm,
    Route::ReceiptUpload,
];

/// Home menu. `None` means the user chose to leave.
pub fn show(prompter: &mut dyn Prompter, signed_in_as: Option<&str>) -> anyhow::Result<Option<Route>> {
    let title = signed_in_as.map_or_else(
        || String::from("Home (not signed in)"),
        |user| format!("Home (signed in as {user})"),
    );
    let labels = DESTINATIONS
        .iter()
        .map(|route| route.title())
        .collect::<Vec<_>>();

    Ok(prompt::menu(prompter, &title, &labels)?.map(|index| DESTINATIONS[index].clone()))
}
