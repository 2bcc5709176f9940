use super::notifier::Notification;
use crate::catalog::Job;
use crate::directory::User;

/// Fixed digest template for one posting and one recipient.
pub fn compose(job: &Job, user: &User) -> Notification {
    let subject = format!(
        "Job Seeker's Dream: {} in {} Grab it Now",
        job.title, job.job_niche
    );
    let body = format!(
        "Hello {name},\n\
         \n\
         We hope this message finds you well! We are excited to share a job opportunity that could be your next big career move:\n\
         \n\
         Job Title: {title}\n\
         Company: {company}\n\
         Location: {location}\n\
         Salary: {salary}\n\
         \n\
         Sign in to the job board and start your application today.\n\
         \n\
         Best regards,\n\
         The Job Seeker's Dream Team\n",
        name = user.name,
        title = job.title,
        company = job.company_name,
        location = job.location,
        salary = job.salary,
    );

    Notification {
        recipient_email: user.email.clone(),
        recipient_name: user.name.clone(),
        subject,
        body,
    }
}
