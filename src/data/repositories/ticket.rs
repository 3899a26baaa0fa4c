use crate::data::models::{TicketCommentRow, TicketRow};
use crate::schema::{ticket_comments, tickets};
use diesel::prelude::*;

pub struct TicketRepository;

impl TicketRepository {
    pub fn insert_ticket(
        conn: &mut SqliteConnection,
        ticket: &TicketRow,
    ) -> Result<usize, diesel::result::Error> {
        diesel::insert_into(tickets::table).values(ticket).execute(conn)
    }

    pub fn find_ticket(
        conn: &mut SqliteConnection,
        ticket_id: &str,
    ) -> Result<Option<TicketRow>, diesel::result::Error> {
        tickets::table
            .find(ticket_id)
            .select(TicketRow::as_select())
            .first(conn)
            .optional()
    }

    pub fn ticket_exists(
        conn: &mut SqliteConnection,
        ticket_id: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(tickets::table.find(ticket_id))).get_result(conn)
    }

    /// Comments in the order they were added.
    pub fn comments_for(
        conn: &mut SqliteConnection,
        ticket_id: &str,
    ) -> Result<Vec<TicketCommentRow>, diesel::result::Error> {
        ticket_comments::table
            .filter(ticket_comments::ticket_id.eq(ticket_id))
            .order_by((ticket_comments::position.asc(), ticket_comments::id.asc()))
            .select(TicketCommentRow::as_select())
            .load(conn)
    }

    pub fn next_comment_position(
        conn: &mut SqliteConnection,
        ticket_id: &str,
    ) -> Result<i32, diesel::result::Error> {
        let last: Option<i32> = ticket_comments::table
            .filter(ticket_comments::ticket_id.eq(ticket_id))
            .select(diesel::dsl::max(ticket_comments::position))
            .first(conn)?;

        Ok(last.map_or(0, |p| p + 1))
    }

    pub fn insert_comment(
        conn: &mut SqliteConnection,
        comment: &TicketCommentRow,
    ) -> Result<usize, diesel::result::Error> {
        diesel::insert_into(ticket_comments::table)
            .values(comment)
            .execute(conn)
    }
}
