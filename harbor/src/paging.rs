// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

use crate::transport::{Response, TransportError};
use std::future::Future;

/// Fetches pages starting at `first_page` and accumulates their items until an
/// empty page comes back or the accumulated count reaches the server reported
/// total. A response without a total count ends the loop after its page.
pub(crate) async fn collect_pages<T, F, Fut>(
    first_page: i64,
    mut fetch: F,
) -> Result<Vec<T>, TransportError>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<Response<Vec<T>>, TransportError>>,
{
    let mut items = Vec::new();
    let mut page = first_page;

    loop {
        let response = fetch(page).await?;
        if response.payload.is_empty() {
            break;
        }

        items.extend(response.payload);
        match response.total_count {
            Some(total) if (items.len() as i64) < total => {
                log::trace!(
                    "Fetched {} of {} items, requesting page {}",
                    items.len(),
                    total,
                    page + 1
                );
                page += 1;
            }
            _ => break,
        }
    }

    Ok(items)
}
