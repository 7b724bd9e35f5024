use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{users::User, weekly::Week},
    reports::{self, MemberWeek, ReportFile},
    services::{users as user_service, weekly},
};
use uuid::Uuid;

fn ensure_can_view_all(actor: &User) -> Result<()> {
    if !actor.role.can_view_all_hours() {
        tracing::warn!(user_id = %actor.id, "Rejected export of other users' hours");
        return Err(Error::Forbidden(
            "Only administrators can export other users' hours".to_string(),
        ));
    }
    Ok(())
}

/// The user's own weekly grid
pub async fn export_own_week(conn: &mut DbConn, user: &User, week: &Week) -> Result<ReportFile> {
    let records = weekly::weekly_records(conn, user.id, week).await?;
    let report = reports::build_weekly_report(user.name(), week, &records)?;

    tracing::info!(
        user_id = %user.id,
        week_start = %week.start,
        records = records.len(),
        "Weekly report exported"
    );
    Ok(report)
}

/// Admin export of one member's records for the week
pub async fn export_member_week(
    conn: &mut DbConn,
    actor: &User,
    member_id: Uuid,
    week: &Week,
) -> Result<ReportFile> {
    ensure_can_view_all(actor)?;

    let member = user_service::get_user(conn, member_id).await?;
    let records = weekly::weekly_records(conn, member.id, week).await?;
    let report = reports::build_member_export(member.name(), week, &records)?;

    tracing::info!(member_id = %member.id, week_start = %week.start, "Member report exported");
    Ok(report)
}

/// Admin export of every non-admin user for the week
pub async fn export_all_members(
    conn: &mut DbConn,
    actor: &User,
    week: &Week,
) -> Result<ReportFile> {
    ensure_can_view_all(actor)?;

    let members = user_service::list_members(conn).await?;
    let mut weeks = Vec::with_capacity(members.len());
    for member in members {
        let records = weekly::weekly_records(conn, member.id, week).await?;
        weeks.push(MemberWeek {
            name: member.name().to_string(),
            summary: weekly::summarize(week, &records),
            records,
        });
    }
    let report = reports::build_all_members_report(week, &weeks)?;

    tracing::info!(members = weeks.len(), week_start = %week.start, "All-members report exported");
    Ok(report)
}
